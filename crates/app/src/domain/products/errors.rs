//! Products service errors.

use thiserror::Error;

use crate::{domain::stock::StockLedgerError, storage::RepositoryError};

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("product already exists")]
    AlreadyExists,

    #[error("product not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("price must not be negative")]
    NegativePrice,

    #[error("discount percentage must be between 0 and 100")]
    InvalidDiscount,

    #[error("price and discount allow at most two decimal places")]
    TooPrecise,

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("stock adjustment rejected")]
    Stock(#[source] StockLedgerError),

    #[error("storage error")]
    Storage(#[source] RepositoryError),
}

impl From<RepositoryError> for ProductsServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::AlreadyExists => Self::AlreadyExists,
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::InvalidReference => Self::InvalidReference,
            RepositoryError::MissingRequiredData => Self::MissingRequiredData,
            RepositoryError::InvalidData => Self::InvalidData,
            RepositoryError::Sql(_) => Self::Storage(error),
        }
    }
}

impl From<StockLedgerError> for ProductsServiceError {
    fn from(error: StockLedgerError) -> Self {
        match error {
            StockLedgerError::ProductNotFound(_) => Self::NotFound,
            StockLedgerError::Storage(error) => Self::from(error),
            StockLedgerError::StockViolation { .. } => Self::Stock(error),
        }
    }
}
