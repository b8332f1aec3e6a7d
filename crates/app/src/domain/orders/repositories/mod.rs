//! Order repositories.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::{
        orders::{
            models::{NewOrder, NewOrderLine, Order, OrderLine, OrderUuid, StatusChange},
            status::OrderStatus,
        },
        owners::Owner,
    },
    storage::RepositoryError,
};

mod lines;
mod orders;

pub use lines::PgOrderLinesRepository;
pub use orders::PgOrdersRepository;

/// Order headers. Returned orders never carry lines.
#[automock]
#[async_trait]
pub trait OrdersRepository: Send + Sync {
    /// Fails with [`RepositoryError::AlreadyExists`] when the order number is taken.
    async fn create_order(&self, order: NewOrder) -> Result<Order, RepositoryError>;

    async fn get_order(&self, order: OrderUuid) -> Result<Order, RepositoryError>;

    /// An owner's orders, newest first.
    async fn list_orders(&self, owner: &Owner) -> Result<Vec<Order>, RepositoryError>;

    /// Applies `change` only while the order is still in `expected`.
    /// Returns `None` when the status had already moved on.
    async fn update_status(
        &self,
        order: OrderUuid,
        expected: OrderStatus,
        change: StatusChange,
    ) -> Result<Option<Order>, RepositoryError>;

    /// Removes a half-built order along with its lines.
    async fn discard_order(&self, order: OrderUuid) -> Result<u64, RepositoryError>;
}

#[automock]
#[async_trait]
pub trait OrderLinesRepository: Send + Sync {
    async fn create_line(
        &self,
        order: OrderUuid,
        line: NewOrderLine,
    ) -> Result<OrderLine, RepositoryError>;

    async fn list_lines(&self, order: OrderUuid) -> Result<Vec<OrderLine>, RepositoryError>;
}
