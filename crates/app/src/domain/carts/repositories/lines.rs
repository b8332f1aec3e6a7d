//! Cart Lines Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as};

use crate::{
    database::Db,
    domain::{
        carts::{
            models::{CartLine, CartLineUuid, CartUuid, NewCartLine},
            repositories::CartLinesRepository,
        },
        products::models::ProductUuid,
    },
    storage::{RepositoryError, to_i32, try_get_u32},
};

const LIST_CART_LINES_SQL: &str = include_str!("../sql/list_cart_lines.sql");
const GET_CART_LINE_SQL: &str = include_str!("../sql/get_cart_line.sql");
const FIND_CART_LINE_FOR_PRODUCT_SQL: &str = include_str!("../sql/find_cart_line_for_product.sql");
const CREATE_CART_LINE_SQL: &str = include_str!("../sql/create_cart_line.sql");
const SET_CART_LINE_QUANTITY_SQL: &str = include_str!("../sql/set_cart_line_quantity.sql");
const DELETE_CART_LINE_SQL: &str = include_str!("../sql/delete_cart_line.sql");
const DELETE_CART_LINES_SQL: &str = include_str!("../sql/delete_cart_lines.sql");
const TAKE_CART_LINES_SQL: &str = include_str!("../sql/take_cart_lines.sql");

#[derive(Debug, Clone)]
pub struct PgCartLinesRepository {
    db: Db,
}

impl PgCartLinesRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartLinesRepository for PgCartLinesRepository {
    async fn list_lines(&self, cart: CartUuid) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = query_as::<Postgres, CartLine>(LIST_CART_LINES_SQL)
            .bind(cart.into_uuid())
            .fetch_all(self.db.pool())
            .await?;

        Ok(lines)
    }

    async fn get_line(
        &self,
        cart: CartUuid,
        line: CartLineUuid,
    ) -> Result<Option<CartLine>, RepositoryError> {
        let line = query_as::<Postgres, CartLine>(GET_CART_LINE_SQL)
            .bind(cart.into_uuid())
            .bind(line.into_uuid())
            .fetch_optional(self.db.pool())
            .await?;

        Ok(line)
    }

    async fn find_line_for_product(
        &self,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<Option<CartLine>, RepositoryError> {
        let line = query_as::<Postgres, CartLine>(FIND_CART_LINE_FOR_PRODUCT_SQL)
            .bind(cart.into_uuid())
            .bind(product.into_uuid())
            .fetch_optional(self.db.pool())
            .await?;

        Ok(line)
    }

    async fn create_line(
        &self,
        cart: CartUuid,
        line: NewCartLine,
    ) -> Result<CartLine, RepositoryError> {
        let quantity = to_i32(line.quantity, "quantity")?;

        let created = query_as::<Postgres, CartLine>(CREATE_CART_LINE_SQL)
            .bind(line.uuid.into_uuid())
            .bind(cart.into_uuid())
            .bind(line.product_uuid.into_uuid())
            .bind(quantity)
            .bind(line.price_at_time)
            .bind(line.discount_at_time)
            .fetch_one(self.db.pool())
            .await?;

        Ok(created)
    }

    async fn set_quantity(
        &self,
        cart: CartUuid,
        line: CartLineUuid,
        quantity: u32,
    ) -> Result<Option<CartLine>, RepositoryError> {
        let quantity = to_i32(quantity, "quantity")?;

        let updated = query_as::<Postgres, CartLine>(SET_CART_LINE_QUANTITY_SQL)
            .bind(cart.into_uuid())
            .bind(line.into_uuid())
            .bind(quantity)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(updated)
    }

    async fn delete_line(
        &self,
        cart: CartUuid,
        line: CartLineUuid,
    ) -> Result<u64, RepositoryError> {
        let rows_affected = query(DELETE_CART_LINE_SQL)
            .bind(cart.into_uuid())
            .bind(line.into_uuid())
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn delete_lines(&self, cart: CartUuid) -> Result<u64, RepositoryError> {
        let rows_affected = query(DELETE_CART_LINES_SQL)
            .bind(cart.into_uuid())
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn take_lines(&self, cart: CartUuid) -> Result<Vec<CartLine>, RepositoryError> {
        let mut lines = query_as::<Postgres, CartLine>(TAKE_CART_LINES_SQL)
            .bind(cart.into_uuid())
            .fetch_all(self.db.pool())
            .await?;

        lines.sort_by_key(|line| (line.created_at, line.uuid));

        Ok(lines)
    }
}

impl<'r> FromRow<'r, PgRow> for CartLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartLineUuid::from_uuid(row.try_get("uuid")?),
            cart_uuid: CartUuid::from_uuid(row.try_get("cart_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity: try_get_u32(row, "quantity")?,
            price_at_time: row.try_get("price_at_time")?,
            discount_at_time: row.try_get("discount_at_time")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
