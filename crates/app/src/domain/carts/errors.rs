//! Carts service errors.

use thiserror::Error;

use crate::{
    domain::{owners::OwnerRequired, products::models::ProductUuid},
    storage::RepositoryError,
};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("a user or a session is required")]
    OwnerRequired,

    #[error("cart not found")]
    NotFound,

    #[error("cart line not found")]
    LineNotFound,

    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("insufficient stock for product {product}, {available} available")]
    InsufficientStock { product: ProductUuid, available: u32 },

    #[error("cart already exists")]
    AlreadyExists,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Storage(#[source] RepositoryError),
}

impl From<OwnerRequired> for CartsServiceError {
    fn from(_: OwnerRequired) -> Self {
        Self::OwnerRequired
    }
}

impl From<RepositoryError> for CartsServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::AlreadyExists => Self::AlreadyExists,
            RepositoryError::InvalidData => Self::InvalidData,
            RepositoryError::InvalidReference
            | RepositoryError::MissingRequiredData
            | RepositoryError::Sql(_) => Self::Storage(error),
        }
    }
}
