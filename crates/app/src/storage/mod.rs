//! Storage backends and the error type every repository reports.

use std::sync::Arc;

use sqlx::{
    Error, Row,
    error::{DatabaseError, ErrorKind},
    postgres::PgRow,
};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    auth::{AuthRepository, PgAuthRepository},
    database::Db,
    domain::{
        carts::repositories::{
            CartLinesRepository, CartsRepository, PgCartLinesRepository, PgCartsRepository,
        },
        owners::{Owner, SessionId, UserUuid},
        orders::repositories::{
            OrderLinesRepository, OrdersRepository, PgOrderLinesRepository, PgOrdersRepository,
        },
        products::repository::{PgProductsRepository, ProductsRepository},
    },
};

pub mod memory;

pub use memory::InMemoryStore;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    AlreadyExists,

    #[error("record not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for RepositoryError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

/// Every repository the services need, behind trait objects.
#[derive(Clone)]
pub struct Repositories {
    pub products: Arc<dyn ProductsRepository>,
    pub carts: Arc<dyn CartsRepository>,
    pub cart_lines: Arc<dyn CartLinesRepository>,
    pub orders: Arc<dyn OrdersRepository>,
    pub order_lines: Arc<dyn OrderLinesRepository>,
    pub auth: Arc<dyn AuthRepository>,
}

impl Repositories {
    #[must_use]
    pub fn postgres(db: &Db) -> Self {
        Self {
            products: Arc::new(PgProductsRepository::new(db.clone())),
            carts: Arc::new(PgCartsRepository::new(db.clone())),
            cart_lines: Arc::new(PgCartLinesRepository::new(db.clone())),
            orders: Arc::new(PgOrdersRepository::new(db.clone())),
            order_lines: Arc::new(PgOrderLinesRepository::new(db.clone())),
            auth: Arc::new(PgAuthRepository::new(db.clone())),
        }
    }

    #[must_use]
    pub fn in_memory(store: &Arc<InMemoryStore>) -> Self {
        Self {
            products: store.clone(),
            carts: store.clone(),
            cart_lines: store.clone(),
            orders: store.clone(),
            order_lines: store.clone(),
            auth: store.clone(),
        }
    }
}

/// Reads a non-negative `INTEGER` column as `u32`.
pub(crate) fn try_get_u32(row: &PgRow, column: &str) -> sqlx::Result<u32> {
    let value: i32 = row.try_get(column)?;

    u32::try_from(value).map_err(|e| Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Splits an owner into the `user_uuid` and `session_id` columns.
pub(crate) fn owner_columns(owner: &Owner) -> (Option<Uuid>, Option<String>) {
    match owner {
        Owner::User(user) => (Some(user.into_uuid()), None),
        Owner::Session(session) => (None, Some(session.as_str().to_string())),
    }
}

/// Reads the `user_uuid` and `session_id` columns back into an owner.
pub(crate) fn try_get_owner(row: &PgRow) -> sqlx::Result<Owner> {
    let user: Option<Uuid> = row.try_get("user_uuid")?;
    let session: Option<String> = row.try_get("session_id")?;

    let session = session
        .map(SessionId::parse)
        .transpose()
        .map_err(|e| Error::ColumnDecode {
            index: "session_id".to_string(),
            source: Box::new(e),
        })?;

    Owner::resolve(user.map(UserUuid::from_uuid), session).map_err(|e| Error::ColumnDecode {
        index: "user_uuid".to_string(),
        source: Box::new(e),
    })
}

/// Converts a count into the `INTEGER` the schema stores.
pub(crate) fn to_i32(value: u32, column: &str) -> Result<i32, RepositoryError> {
    i32::try_from(value).map_err(|e| {
        RepositoryError::Sql(Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(
            RepositoryError::from(Error::RowNotFound),
            RepositoryError::NotFound
        ));
    }

    #[test]
    fn other_errors_are_kept_as_sql() {
        assert!(matches!(
            RepositoryError::from(Error::PoolTimedOut),
            RepositoryError::Sql(Error::PoolTimedOut)
        ));
    }

    #[test]
    fn oversized_counts_are_rejected() {
        assert!(to_i32(u32::MAX, "stock").is_err());
        assert_eq!(to_i32(42, "stock").ok(), Some(42));
    }
}
