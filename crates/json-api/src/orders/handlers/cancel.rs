//! Cancel Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{get::OrderResponse, into_status_error},
    state::State,
};

/// Cancel Order Handler
///
/// Cancels an order that has not shipped yet and returns its units to stock.
#[endpoint(
    tags("orders"),
    summary = "Cancel Order",
    security(("bearer_auth" = []), ("session_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order cancelled"),
        (status_code = StatusCode::BAD_REQUEST, description = "Order can no longer be cancelled"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.cancel",
    skip(order, depot),
    fields(order_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.owner_or_400()?;
    let order = order.into_inner();

    tracing::Span::current().record("order_uuid", tracing::field::display(order));

    let cancelled = state
        .app
        .orders
        .cancel_order(&owner, order.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(cancelled.into()))
}
