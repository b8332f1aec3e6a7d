//! Confirm Payment Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{get::OrderResponse, into_status_error},
    state::State,
};

/// Confirm Payment Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ConfirmPaymentRequest {
    /// Reference from the payment provider
    pub payment_id: String,
}

/// Confirm Payment Handler
///
/// Records that a pending payment has been settled.
#[endpoint(
    tags("orders"),
    summary = "Confirm Payment",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Payment recorded"),
        (status_code = StatusCode::BAD_REQUEST, description = "Payment is not pending"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Forbidden"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<ConfirmPaymentRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    depot.admin_or_403()?;

    let state = depot.obtain_or_500::<Arc<State>>()?;
    let payment_id = json.into_inner().payment_id;

    if payment_id.trim().is_empty() {
        return Err(StatusError::bad_request()
            .brief("invalid_payment_id")
            .cause("payment_id must not be blank"));
    }

    let order = state
        .app
        .orders
        .confirm_payment(order.into_inner().into(), payment_id)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
