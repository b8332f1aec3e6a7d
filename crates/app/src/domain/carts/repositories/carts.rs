//! Carts Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as};

use crate::{
    database::Db,
    domain::{
        carts::{
            models::{Cart, CartUuid, NewCart},
            repositories::CartsRepository,
        },
        owners::Owner,
    },
    storage::{RepositoryError, owner_columns, try_get_owner},
};

const FIND_ACTIVE_CART_SQL: &str = include_str!("../sql/find_active_cart.sql");
const GET_CART_SQL: &str = include_str!("../sql/get_cart.sql");
const CREATE_CART_SQL: &str = include_str!("../sql/create_cart.sql");
const DEACTIVATE_CART_SQL: &str = include_str!("../sql/deactivate_cart.sql");
const DELETE_CART_SQL: &str = include_str!("../sql/delete_cart.sql");

#[derive(Debug, Clone)]
pub struct PgCartsRepository {
    db: Db,
}

impl PgCartsRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartsRepository for PgCartsRepository {
    async fn find_active_cart(&self, owner: &Owner) -> Result<Option<Cart>, RepositoryError> {
        let (user, session) = owner_columns(owner);

        let cart = query_as::<Postgres, Cart>(FIND_ACTIVE_CART_SQL)
            .bind(user)
            .bind(session)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(cart)
    }

    async fn get_cart(&self, cart: CartUuid) -> Result<Cart, RepositoryError> {
        let cart = query_as::<Postgres, Cart>(GET_CART_SQL)
            .bind(cart.into_uuid())
            .fetch_one(self.db.pool())
            .await?;

        Ok(cart)
    }

    async fn create_cart(&self, cart: NewCart) -> Result<Cart, RepositoryError> {
        let (user, session) = owner_columns(&cart.owner);

        let created = query_as::<Postgres, Cart>(CREATE_CART_SQL)
            .bind(cart.uuid.into_uuid())
            .bind(user)
            .bind(session)
            .fetch_one(self.db.pool())
            .await?;

        Ok(created)
    }

    async fn deactivate_cart(&self, cart: CartUuid) -> Result<u64, RepositoryError> {
        let rows_affected = query(DEACTIVATE_CART_SQL)
            .bind(cart.into_uuid())
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn delete_cart(&self, cart: CartUuid) -> Result<u64, RepositoryError> {
        let rows_affected = query(DELETE_CART_SQL)
            .bind(cart.into_uuid())
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Cart {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            owner: try_get_owner(row)?,
            is_active: row.try_get("is_active")?,
            lines: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
