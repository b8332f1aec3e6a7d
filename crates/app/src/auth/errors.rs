//! Auth service errors.

use thiserror::Error;

use crate::storage::RepositoryError;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("token not found")]
    NotFound,

    #[error("token processing error")]
    Token(#[from] ApiTokenError),

    #[error("storage error")]
    Storage(#[source] RepositoryError),
}

impl From<RepositoryError> for AuthServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound => Self::NotFound,
            _ => Self::Storage(error),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiTokenError {
    #[error("api token format is invalid")]
    InvalidFormat,
}
