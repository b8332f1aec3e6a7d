//! Order Lines Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query_as};

use crate::{
    database::Db,
    domain::{
        orders::{
            models::{NewOrderLine, OrderLine, OrderLineUuid, OrderUuid, ProductSnapshot},
            repositories::OrderLinesRepository,
        },
        products::models::ProductUuid,
    },
    storage::{RepositoryError, to_i32, try_get_u32},
};

const CREATE_ORDER_LINE_SQL: &str = include_str!("../sql/create_order_line.sql");
const LIST_ORDER_LINES_SQL: &str = include_str!("../sql/list_order_lines.sql");

#[derive(Debug, Clone)]
pub struct PgOrderLinesRepository {
    db: Db,
}

impl PgOrderLinesRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderLinesRepository for PgOrderLinesRepository {
    async fn create_line(
        &self,
        order: OrderUuid,
        line: NewOrderLine,
    ) -> Result<OrderLine, RepositoryError> {
        let quantity = to_i32(line.quantity, "quantity")?;

        let created = query_as::<Postgres, OrderLine>(CREATE_ORDER_LINE_SQL)
            .bind(line.uuid.into_uuid())
            .bind(order.into_uuid())
            .bind(line.product_uuid.into_uuid())
            .bind(line.snapshot.title)
            .bind(line.snapshot.description)
            .bind(line.snapshot.brand)
            .bind(line.snapshot.thumbnail)
            .bind(line.snapshot.category)
            .bind(quantity)
            .bind(line.unit_price)
            .bind(line.discount_percentage)
            .bind(line.discounted_price)
            .bind(line.line_total)
            .fetch_one(self.db.pool())
            .await?;

        Ok(created)
    }

    async fn list_lines(&self, order: OrderUuid) -> Result<Vec<OrderLine>, RepositoryError> {
        let lines = query_as::<Postgres, OrderLine>(LIST_ORDER_LINES_SQL)
            .bind(order.into_uuid())
            .fetch_all(self.db.pool())
            .await?;

        Ok(lines)
    }
}

impl<'r> FromRow<'r, PgRow> for OrderLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderLineUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            snapshot: ProductSnapshot {
                title: row.try_get("title")?,
                description: row.try_get("description")?,
                brand: row.try_get("brand")?,
                thumbnail: row.try_get("thumbnail")?,
                category: row.try_get("category")?,
            },
            quantity: try_get_u32(row, "quantity")?,
            unit_price: row.try_get("unit_price")?,
            discount_percentage: row.try_get("discount_percentage")?,
            discounted_price: row.try_get("discounted_price")?,
            line_total: row.try_get("line_total")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
