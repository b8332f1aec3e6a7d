//! Create Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use shopfront_app::domain::orders::{
    OrdersServiceError,
    models::{Checkout, Order, PaymentMethod},
};

use crate::{
    extensions::*,
    observability::observe_checkout,
    orders::{
        get::{AddressPayload, OrderResponse},
        into_status_error,
    },
    state::State,
};

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    pub shipping_address: AddressPayload,

    /// Defaults to the shipping address
    pub billing_address: Option<AddressPayload>,

    /// `credit_card`, `debit_card`, `paypal` or `cash_on_delivery`
    pub payment_method: String,

    /// Reference from the payment provider, stored as given
    pub payment_id: Option<String>,

    pub notes: Option<String>,
}

impl TryFrom<CreateOrderRequest> for Checkout {
    type Error = StatusError;

    fn try_from(request: CreateOrderRequest) -> Result<Self, Self::Error> {
        let payment_method = request
            .payment_method
            .parse::<PaymentMethod>()
            .or_400("could not parse \"payment_method\"")?;

        Ok(Checkout {
            shipping_address: request.shipping_address.into(),
            billing_address: request.billing_address.map(Into::into),
            payment_method,
            payment_id: request.payment_id,
            notes: request.notes,
        })
    }
}

fn checkout_outcome(result: &Result<Order, OrdersServiceError>) -> &'static str {
    match result {
        Ok(_) => "placed",
        Err(OrdersServiceError::EmptyCart) => "empty_cart",
        Err(OrdersServiceError::InsufficientStock { .. }) => "insufficient_stock",
        Err(OrdersServiceError::StockRace { .. }) => "stock_race",
        Err(OrdersServiceError::DuplicateOrderNumber) => "duplicate_order_number",
        Err(_) => "failed",
    }
}

/// Create Order Handler
///
/// Turns the caller's active cart into an order. Stock is debited, the cart is
/// retired, and the totals are fixed at the cart's captured prices.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    security(("bearer_auth" = []), ("session_id" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart, insufficient stock or bad payload"),
        (status_code = StatusCode::CONFLICT, description = "Stock changed while ordering, retry"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.create",
    skip(json, depot, res),
    fields(owner = tracing::field::Empty, order_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.owner_or_400()?;
    let checkout = Checkout::try_from(json.into_inner())?;

    let span = tracing::Span::current();

    span.record("owner", tracing::field::display(&owner));

    let result = state.app.orders.create_order(&owner, checkout).await;

    observe_checkout(checkout_outcome(&result));

    let order = result.map_err(into_status_error)?;

    span.record("order_uuid", tracing::field::display(order.uuid));

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
