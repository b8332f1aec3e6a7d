//! Cart repositories.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::{
        carts::models::{Cart, CartLine, CartLineUuid, CartUuid, NewCart, NewCartLine},
        owners::Owner,
        products::models::ProductUuid,
    },
    storage::RepositoryError,
};

mod carts;
mod lines;

pub use carts::PgCartsRepository;
pub use lines::PgCartLinesRepository;

/// Cart headers. Returned carts never carry lines.
#[automock]
#[async_trait]
pub trait CartsRepository: Send + Sync {
    /// The single active cart of an owner, if one exists.
    async fn find_active_cart(&self, owner: &Owner) -> Result<Option<Cart>, RepositoryError>;

    async fn get_cart(&self, cart: CartUuid) -> Result<Cart, RepositoryError>;

    /// Fails with [`RepositoryError::AlreadyExists`] when the owner already has
    /// an active cart.
    async fn create_cart(&self, cart: NewCart) -> Result<Cart, RepositoryError>;

    async fn deactivate_cart(&self, cart: CartUuid) -> Result<u64, RepositoryError>;

    /// Deletes a cart along with its lines.
    async fn delete_cart(&self, cart: CartUuid) -> Result<u64, RepositoryError>;
}

#[automock]
#[async_trait]
pub trait CartLinesRepository: Send + Sync {
    async fn list_lines(&self, cart: CartUuid) -> Result<Vec<CartLine>, RepositoryError>;

    async fn get_line(
        &self,
        cart: CartUuid,
        line: CartLineUuid,
    ) -> Result<Option<CartLine>, RepositoryError>;

    async fn find_line_for_product(
        &self,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<Option<CartLine>, RepositoryError>;

    /// Fails with [`RepositoryError::AlreadyExists`] when the cart already has
    /// a line for the product.
    async fn create_line(
        &self,
        cart: CartUuid,
        line: NewCartLine,
    ) -> Result<CartLine, RepositoryError>;

    async fn set_quantity(
        &self,
        cart: CartUuid,
        line: CartLineUuid,
        quantity: u32,
    ) -> Result<Option<CartLine>, RepositoryError>;

    async fn delete_line(&self, cart: CartUuid, line: CartLineUuid)
    -> Result<u64, RepositoryError>;

    async fn delete_lines(&self, cart: CartUuid) -> Result<u64, RepositoryError>;

    /// Deletes every line of a cart and hands them back. Concurrent callers
    /// never receive the same line twice.
    async fn take_lines(&self, cart: CartUuid) -> Result<Vec<CartLine>, RepositoryError>;
}
