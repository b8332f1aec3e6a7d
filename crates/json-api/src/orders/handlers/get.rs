//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shopfront_app::domain::orders::models::{Address, Order, OrderLine};

use crate::{extensions::*, money::format_money, orders::into_status_error, state::State};

/// Postal address
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressPayload {
    pub full_name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<String>,
}

impl From<AddressPayload> for Address {
    fn from(address: AddressPayload) -> Self {
        Address {
            full_name: address.full_name,
            line1: address.line1,
            line2: address.line2,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            country: address.country,
            phone: address.phone,
        }
    }
}

impl From<Address> for AddressPayload {
    fn from(address: Address) -> Self {
        AddressPayload {
            full_name: address.full_name,
            line1: address.line1,
            line2: address.line2,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            country: address.country,
            phone: address.phone,
        }
    }
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,
    pub order_number: String,

    /// `user:<uuid>` or `session:<id>`
    pub owner: String,

    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub payment_id: Option<String>,

    /// Undiscounted sum of the lines
    pub total_amount: String,

    /// What the customer pays, shipping and tax included
    pub discounted_total: String,

    pub shipping_cost: String,
    pub tax: String,
    pub total_products: u32,
    pub total_quantity: u32,
    pub shipping_address: AddressPayload,
    pub billing_address: AddressPayload,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
    pub estimated_delivery: String,
    pub delivered_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub lines: Vec<OrderLineResponse>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            uuid: order.uuid.into_uuid(),
            order_number: order.order_number,
            owner: order.owner.to_string(),
            status: order.status.to_string(),
            payment_status: order.payment_status.to_string(),
            payment_method: order.payment_method.to_string(),
            payment_id: order.payment_id,
            total_amount: format_money(order.total_amount),
            discounted_total: format_money(order.discounted_total),
            shipping_cost: format_money(order.shipping_cost),
            tax: format_money(order.tax),
            total_products: order.total_products,
            total_quantity: order.total_quantity,
            shipping_address: order.shipping_address.into(),
            billing_address: order.billing_address.into(),
            tracking_number: order.tracking_number,
            notes: order.notes,
            estimated_delivery: order.estimated_delivery.to_string(),
            delivered_at: order.delivered_at.map(|at| at.to_string()),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
            lines: order.lines.into_iter().map(Into::into).collect(),
        }
    }
}

/// Order Line Response
///
/// Catalog details and prices as they were when the order was placed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderLineResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub title: String,
    pub description: String,
    pub brand: Option<String>,
    pub thumbnail: Option<String>,
    pub category: String,
    pub quantity: u32,
    pub unit_price: String,
    pub discount_percentage: String,
    pub discounted_price: String,
    pub line_total: String,
}

impl From<OrderLine> for OrderLineResponse {
    fn from(line: OrderLine) -> Self {
        OrderLineResponse {
            uuid: line.uuid.into_uuid(),
            product_uuid: line.product_uuid.into_uuid(),
            title: line.snapshot.title,
            description: line.snapshot.description,
            brand: line.snapshot.brand,
            thumbnail: line.snapshot.thumbnail,
            category: line.snapshot.category,
            quantity: line.quantity,
            unit_price: format_money(line.unit_price),
            discount_percentage: line.discount_percentage.normalize().to_string(),
            discounted_price: format_money(line.discounted_price),
            line_total: format_money(line.line_total),
        }
    }
}

/// Get Order Handler
///
/// Returns one of the caller's orders with its lines.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = []), ("session_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order found"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.owner_or_400()?;

    let order = state
        .app
        .orders
        .get_order(&owner, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
