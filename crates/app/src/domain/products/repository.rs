//! Products Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    database::Db,
    domain::products::models::{NewProduct, Product, ProductUpdate, ProductUuid},
    storage::{RepositoryError, to_i32, try_get_u32},
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");
const ADJUST_STOCK_SQL: &str = include_str!("sql/adjust_stock.sql");
const GET_STOCK_SQL: &str = include_str!("sql/get_stock.sql");

/// Outcome of a guarded stock update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAdjustment {
    /// The delta was applied; `stock` is the new level.
    Applied { stock: u32 },

    /// Applying the delta would have taken stock below zero. Nothing changed.
    Rejected { available: u32 },
}

#[automock]
#[async_trait]
pub trait ProductsRepository: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;

    async fn get_product(&self, product: ProductUuid) -> Result<Product, RepositoryError>;

    async fn create_product(&self, product: NewProduct) -> Result<Product, RepositoryError>;

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, RepositoryError>;

    /// Soft-deletes a product, returning the number of rows affected.
    async fn delete_product(&self, product: ProductUuid) -> Result<u64, RepositoryError>;

    /// Applies `stock += delta` in a single atomic step, only when the result
    /// stays non-negative. Deleted products still accept adjustments so that
    /// cancelled orders can give their units back.
    async fn adjust_stock(
        &self,
        product: ProductUuid,
        delta: i64,
    ) -> Result<StockAdjustment, RepositoryError>;
}

#[derive(Debug, Clone)]
pub struct PgProductsRepository {
    db: Db,
}

impl PgProductsRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductsRepository for PgProductsRepository {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = query_as::<Postgres, Product>(LIST_PRODUCTS_SQL)
            .fetch_all(self.db.pool())
            .await?;

        Ok(products)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, RepositoryError> {
        let product = query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(self.db.pool())
            .await?;

        Ok(product)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let stock = to_i32(product.stock, "stock")?;

        let created = query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.title)
            .bind(product.description)
            .bind(product.brand)
            .bind(product.thumbnail)
            .bind(product.category)
            .bind(product.price)
            .bind(product.discount_percentage)
            .bind(stock)
            .fetch_one(self.db.pool())
            .await?;

        Ok(created)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        let updated = query_as::<Postgres, Product>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(update.title)
            .bind(update.description)
            .bind(update.brand)
            .bind(update.thumbnail)
            .bind(update.category)
            .bind(update.price)
            .bind(update.discount_percentage)
            .fetch_one(self.db.pool())
            .await?;

        Ok(updated)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<u64, RepositoryError> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn adjust_stock(
        &self,
        product: ProductUuid,
        delta: i64,
    ) -> Result<StockAdjustment, RepositoryError> {
        let delta = i32::try_from(delta).map_err(|_| RepositoryError::InvalidData)?;

        let applied: Option<i32> = query_scalar(ADJUST_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(delta)
            .fetch_optional(self.db.pool())
            .await?;

        if let Some(stock) = applied {
            let stock = u32::try_from(stock).map_err(|_| RepositoryError::InvalidData)?;

            return Ok(StockAdjustment::Applied { stock });
        }

        let available: i32 = query_scalar(GET_STOCK_SQL)
            .bind(product.into_uuid())
            .fetch_one(self.db.pool())
            .await?;

        let available = u32::try_from(available).map_err(|_| RepositoryError::InvalidData)?;

        Ok(StockAdjustment::Rejected { available })
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            brand: row.try_get("brand")?,
            thumbnail: row.try_get("thumbnail")?,
            category: row.try_get("category")?,
            price: row.try_get("price")?,
            discount_percentage: row.try_get("discount_percentage")?,
            stock: try_get_u32(row, "stock")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
