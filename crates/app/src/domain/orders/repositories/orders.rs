//! Orders Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{Error, FromRow, Postgres, Row, postgres::PgRow, query, query_as, types::Json};

use crate::{
    database::Db,
    domain::{
        orders::{
            models::{Address, NewOrder, Order, OrderUuid, StatusChange},
            repositories::OrdersRepository,
            status::OrderStatus,
        },
        owners::Owner,
    },
    storage::{RepositoryError, owner_columns, to_i32, try_get_owner, try_get_u32},
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("../sql/update_order_status.sql");
const DISCARD_ORDER_SQL: &str = include_str!("../sql/discard_order.sql");

#[derive(Debug, Clone)]
pub struct PgOrdersRepository {
    db: Db,
}

impl PgOrdersRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrdersRepository for PgOrdersRepository {
    async fn create_order(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        let (user, session) = owner_columns(&order.owner);
        let total_products = to_i32(order.total_products, "total_products")?;
        let total_quantity = to_i32(order.total_quantity, "total_quantity")?;

        let created = query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.order_number)
            .bind(user)
            .bind(session)
            .bind(order.status.as_str())
            .bind(order.payment_status.as_str())
            .bind(order.payment_method.as_str())
            .bind(order.payment_id)
            .bind(order.total_amount)
            .bind(order.discounted_total)
            .bind(order.shipping_cost)
            .bind(order.tax)
            .bind(total_products)
            .bind(total_quantity)
            .bind(Json(order.shipping_address))
            .bind(Json(order.billing_address))
            .bind(order.notes)
            .bind(SqlxTimestamp::from(order.estimated_delivery))
            .fetch_one(self.db.pool())
            .await?;

        Ok(created)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<Order, RepositoryError> {
        let order = query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(self.db.pool())
            .await?;

        Ok(order)
    }

    async fn list_orders(&self, owner: &Owner) -> Result<Vec<Order>, RepositoryError> {
        let (user, session) = owner_columns(owner);

        let orders = query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .bind(user)
            .bind(session)
            .fetch_all(self.db.pool())
            .await?;

        Ok(orders)
    }

    async fn update_status(
        &self,
        order: OrderUuid,
        expected: OrderStatus,
        change: StatusChange,
    ) -> Result<Option<Order>, RepositoryError> {
        let updated = query_as::<Postgres, Order>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(expected.as_str())
            .bind(change.status.as_str())
            .bind(change.payment_status.as_str())
            .bind(change.payment_id)
            .bind(change.tracking_number)
            .bind(change.delivered_at.map(SqlxTimestamp::from))
            .bind(change.notes)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(updated)
    }

    async fn discard_order(&self, order: OrderUuid) -> Result<u64, RepositoryError> {
        let rows_affected = query(DISCARD_ORDER_SQL)
            .bind(order.into_uuid())
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn try_get_parsed<T>(row: &PgRow, column: &str) -> sqlx::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.try_get(column)?;

    value.parse().map_err(|e| Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_number: row.try_get("order_number")?,
            owner: try_get_owner(row)?,
            status: try_get_parsed(row, "status")?,
            payment_status: try_get_parsed(row, "payment_status")?,
            payment_method: try_get_parsed(row, "payment_method")?,
            payment_id: row.try_get("payment_id")?,
            total_amount: row.try_get("total_amount")?,
            discounted_total: row.try_get("discounted_total")?,
            shipping_cost: row.try_get("shipping_cost")?,
            tax: row.try_get("tax")?,
            total_products: try_get_u32(row, "total_products")?,
            total_quantity: try_get_u32(row, "total_quantity")?,
            shipping_address: row.try_get::<Json<Address>, _>("shipping_address")?.0,
            billing_address: row.try_get::<Json<Address>, _>("billing_address")?.0,
            tracking_number: row.try_get("tracking_number")?,
            notes: row.try_get("notes")?,
            estimated_delivery: row
                .try_get::<SqlxTimestamp, _>("estimated_delivery")?
                .to_jiff(),
            delivered_at: row
                .try_get::<Option<SqlxTimestamp>, _>("delivered_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            lines: Vec::new(),
        })
    }
}
