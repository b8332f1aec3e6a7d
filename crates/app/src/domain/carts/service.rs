//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, info, warn};

use crate::{
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{Cart, CartLine, CartLineUuid, CartUuid, NewCart, NewCartLine},
            repositories::{CartLinesRepository, CartsRepository},
        },
        owners::{Owner, SessionId, UserUuid},
        products::{
            models::{Product, ProductUuid},
            repository::ProductsRepository,
        },
    },
    storage::RepositoryError,
};

#[derive(Clone)]
pub struct AppCartsService {
    carts: Arc<dyn CartsRepository>,
    lines: Arc<dyn CartLinesRepository>,
    products: Arc<dyn ProductsRepository>,
}

impl AppCartsService {
    #[must_use]
    pub fn new(
        carts: Arc<dyn CartsRepository>,
        lines: Arc<dyn CartLinesRepository>,
        products: Arc<dyn ProductsRepository>,
    ) -> Self {
        Self {
            carts,
            lines,
            products,
        }
    }

    async fn load_product(&self, product: ProductUuid) -> Result<Product, CartsServiceError> {
        match self.products.get_product(product).await {
            Ok(product) => Ok(product),
            Err(RepositoryError::NotFound) => Err(CartsServiceError::ProductNotFound(product)),
            Err(error) => Err(error.into()),
        }
    }

    async fn with_lines(&self, mut cart: Cart) -> Result<Cart, CartsServiceError> {
        let lines = self.lines.list_lines(cart.uuid).await?;

        cart.lines = lines;

        Ok(cart)
    }

    /// Moves one guest line into the user's cart.
    ///
    /// Lines for the same product are summed and capped at current stock.
    /// Lines for products that no longer exist are dropped.
    async fn merge_line(
        &self,
        user_cart: CartUuid,
        guest_line: &CartLine,
    ) -> Result<(), CartsServiceError> {
        let product = match self.load_product(guest_line.product_uuid).await {
            Ok(product) => product,
            Err(CartsServiceError::ProductNotFound(product)) => {
                warn!(%product, "dropping guest line for missing product");

                return Ok(());
            }
            Err(error) => return Err(error),
        };

        let existing = self
            .lines
            .find_line_for_product(user_cart, product.uuid)
            .await?;

        let Some(existing) = existing else {
            self.lines
                .create_line(user_cart, NewCartLine::copy_of(guest_line))
                .await?;

            return Ok(());
        };

        let combined = existing.quantity.saturating_add(guest_line.quantity);
        let capped = combined.min(product.stock);

        // Nothing left to sell; the user's own line stays as it was.
        if capped == 0 {
            return Ok(());
        }

        self.lines
            .set_quantity(user_cart, existing.uuid, capped)
            .await?;

        Ok(())
    }

    /// Recreates the guest cart from the lines that were not merged yet.
    async fn restore_guest(&self, guest: &Cart, lines: &[CartLine]) {
        let restored = self
            .carts
            .create_cart(NewCart {
                uuid: guest.uuid,
                owner: guest.owner.clone(),
            })
            .await;

        if let Err(error) = restored {
            warn!(cart = %guest.uuid, %error, "failed to restore guest cart");

            return;
        }

        for line in lines {
            let new_line = NewCartLine {
                uuid: line.uuid,
                ..NewCartLine::copy_of(line)
            };

            if let Err(error) = self.lines.create_line(guest.uuid, new_line).await {
                warn!(cart = %guest.uuid, line = %line.uuid, %error, "failed to restore guest line");
            }
        }
    }
}

#[async_trait]
impl CartsService for AppCartsService {
    async fn get_or_create_active_cart(&self, owner: &Owner) -> Result<Cart, CartsServiceError> {
        if let Some(cart) = self.carts.find_active_cart(owner).await? {
            return self.with_lines(cart).await;
        }

        let created = self
            .carts
            .create_cart(NewCart {
                uuid: CartUuid::new(),
                owner: owner.clone(),
            })
            .await;

        match created {
            Ok(cart) => {
                debug!(cart = %cart.uuid, %owner, "created cart");

                Ok(cart)
            }
            // Another request created the owner's cart first.
            Err(RepositoryError::AlreadyExists) => {
                let cart = self
                    .carts
                    .find_active_cart(owner)
                    .await?
                    .ok_or(CartsServiceError::NotFound)?;

                self.with_lines(cart).await
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn add_line(
        &self,
        owner: &Owner,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartLine, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let cart = self.get_or_create_active_cart(owner).await?;
        let product = self.load_product(product).await?;

        if let Some(line) = self
            .lines
            .find_line_for_product(cart.uuid, product.uuid)
            .await?
        {
            let combined = line
                .quantity
                .checked_add(quantity)
                .ok_or(CartsServiceError::InvalidQuantity)?;

            if combined > product.stock {
                return Err(CartsServiceError::InsufficientStock {
                    product: product.uuid,
                    available: product.stock,
                });
            }

            return self
                .lines
                .set_quantity(cart.uuid, line.uuid, combined)
                .await?
                .ok_or(CartsServiceError::LineNotFound);
        }

        if quantity > product.stock {
            return Err(CartsServiceError::InsufficientStock {
                product: product.uuid,
                available: product.stock,
            });
        }

        let line = self
            .lines
            .create_line(
                cart.uuid,
                NewCartLine {
                    uuid: CartLineUuid::new(),
                    product_uuid: product.uuid,
                    quantity,
                    price_at_time: product.price,
                    discount_at_time: product.discount_percentage,
                },
            )
            .await?;

        Ok(line)
    }

    async fn set_line_quantity(
        &self,
        owner: &Owner,
        line: CartLineUuid,
        quantity: u32,
    ) -> Result<CartLine, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let cart = self
            .carts
            .find_active_cart(owner)
            .await?
            .ok_or(CartsServiceError::LineNotFound)?;

        let existing = self
            .lines
            .get_line(cart.uuid, line)
            .await?
            .ok_or(CartsServiceError::LineNotFound)?;

        let product = self.load_product(existing.product_uuid).await?;

        if quantity > product.stock {
            return Err(CartsServiceError::InsufficientStock {
                product: product.uuid,
                available: product.stock,
            });
        }

        self.lines
            .set_quantity(cart.uuid, line, quantity)
            .await?
            .ok_or(CartsServiceError::LineNotFound)
    }

    async fn remove_line(&self, owner: &Owner, line: CartLineUuid) -> Result<(), CartsServiceError> {
        let cart = self
            .carts
            .find_active_cart(owner)
            .await?
            .ok_or(CartsServiceError::LineNotFound)?;

        let rows_affected = self.lines.delete_line(cart.uuid, line).await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::LineNotFound);
        }

        Ok(())
    }

    async fn clear(&self, owner: &Owner) -> Result<(), CartsServiceError> {
        if let Some(cart) = self.carts.find_active_cart(owner).await? {
            self.lines.delete_lines(cart.uuid).await?;
        }

        Ok(())
    }

    async fn merge_carts(&self, guest: CartUuid, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let owner = Owner::User(user);

        let guest = match self.carts.get_cart(guest).await {
            Ok(cart) => cart,
            Err(RepositoryError::NotFound) => return self.get_or_create_active_cart(&owner).await,
            Err(error) => return Err(error.into()),
        };

        if guest.owner.session().is_none() {
            warn!(cart = %guest.uuid, "refusing to merge a cart that is not a guest cart");

            return self.get_or_create_active_cart(&owner).await;
        }

        // An ordered cart is kept for its history and has nothing to hand over.
        if !guest.is_active {
            info!(cart = %guest.uuid, "guest cart already ordered, nothing to merge");

            return self.get_or_create_active_cart(&owner).await;
        }

        let user_cart = self.get_or_create_active_cart(&owner).await?;

        // Claiming the lines deletes them, so a concurrent merge sees none.
        let claimed = self.lines.take_lines(guest.uuid).await?;

        self.carts.delete_cart(guest.uuid).await?;

        for (index, line) in claimed.iter().enumerate() {
            if let Err(error) = self.merge_line(user_cart.uuid, line).await {
                warn!(cart = %guest.uuid, %error, "merge failed, restoring guest cart");

                self.restore_guest(&guest, &claimed[index..]).await;

                return Err(error);
            }
        }

        info!(
            guest = %guest.uuid,
            cart = %user_cart.uuid,
            lines = claimed.len(),
            "merged guest cart"
        );

        self.with_lines(user_cart).await
    }

    async fn merge_session_cart(
        &self,
        session: &SessionId,
        user: UserUuid,
    ) -> Result<Cart, CartsServiceError> {
        let guest = self
            .carts
            .find_active_cart(&Owner::Session(session.clone()))
            .await?;

        match guest {
            Some(guest) => self.merge_carts(guest.uuid, user).await,
            None => self.get_or_create_active_cart(&Owner::User(user)).await,
        }
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Returns the owner's active cart with its lines, creating an empty one
    /// when the owner has none.
    async fn get_or_create_active_cart(&self, owner: &Owner) -> Result<Cart, CartsServiceError>;

    /// Adds a product to the owner's cart, capturing its current price and
    /// discount. Adding a product already in the cart increases that line.
    async fn add_line(
        &self,
        owner: &Owner,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartLine, CartsServiceError>;

    /// Replaces a line's quantity.
    async fn set_line_quantity(
        &self,
        owner: &Owner,
        line: CartLineUuid,
        quantity: u32,
    ) -> Result<CartLine, CartsServiceError>;

    /// Removes a line from the owner's cart.
    async fn remove_line(&self, owner: &Owner, line: CartLineUuid) -> Result<(), CartsServiceError>;

    /// Removes every line from the owner's cart.
    async fn clear(&self, owner: &Owner) -> Result<(), CartsServiceError>;

    /// Folds a guest cart into the user's active cart and deletes the guest cart.
    /// Unknown or already ordered guest carts leave the user's cart untouched.
    async fn merge_carts(&self, guest: CartUuid, user: UserUuid) -> Result<Cart, CartsServiceError>;

    /// Merges the active cart of a guest session, if any, into the user's cart.
    async fn merge_session_cart(
        &self,
        session: &SessionId,
        user: UserUuid,
    ) -> Result<Cart, CartsServiceError>;
}
