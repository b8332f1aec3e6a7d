//! Orders service errors.

use thiserror::Error;

use crate::{
    domain::{
        orders::status::OrderStatus, owners::OwnerRequired, products::models::ProductUuid,
        stock::StockLedgerError,
    },
    storage::RepositoryError,
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("a user or a session is required")]
    OwnerRequired,

    #[error("order not found")]
    NotFound,

    #[error("cart is empty")]
    EmptyCart,

    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

    #[error("insufficient stock for product {product}, {available} available")]
    InsufficientStock { product: ProductUuid, available: u32 },

    /// Stock was taken by a concurrent order between the check and the debit.
    #[error("stock for product {product} changed while ordering, {available} available")]
    StockRace { product: ProductUuid, available: u32 },

    #[error("order cannot change from status {status}")]
    InvalidTransition { status: OrderStatus },

    #[error("could not allocate a unique order number")]
    DuplicateOrderNumber,

    #[error("stock ledger error")]
    Ledger(#[source] StockLedgerError),

    #[error("storage error")]
    Storage(#[source] RepositoryError),
}

impl From<OwnerRequired> for OrdersServiceError {
    fn from(_: OwnerRequired) -> Self {
        Self::OwnerRequired
    }
}

impl From<RepositoryError> for OrdersServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::AlreadyExists
            | RepositoryError::InvalidReference
            | RepositoryError::MissingRequiredData
            | RepositoryError::InvalidData
            | RepositoryError::Sql(_) => Self::Storage(error),
        }
    }
}

impl From<StockLedgerError> for OrdersServiceError {
    fn from(error: StockLedgerError) -> Self {
        match error {
            StockLedgerError::ProductNotFound(product) => Self::ProductNotFound(product),
            StockLedgerError::StockViolation { .. } | StockLedgerError::Storage(_) => {
                Self::Ledger(error)
            }
        }
    }
}
