//! Order Status Handler

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

use shopfront_app::domain::orders::{models::StatusUpdate, status::OrderStatus};

use crate::{
    extensions::*,
    orders::{get::OrderResponse, into_status_error},
    state::State,
};

/// Set Order Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SetStatusRequest {
    /// `pending`, `confirmed`, `processing`, `shipped` or `delivered`
    pub status: String,

    pub tracking_number: Option<String>,

    pub notes: Option<String>,
}

impl TryFrom<SetStatusRequest> for StatusUpdate {
    type Error = StatusError;

    fn try_from(request: SetStatusRequest) -> Result<Self, Self::Error> {
        Ok(StatusUpdate {
            status: request
                .status
                .parse::<OrderStatus>()
                .or_400("could not parse \"status\"")?,
            tracking_number: request.tracking_number,
            notes: request.notes,
        })
    }
}

/// Order Status Handler
///
/// Administrative status change. Cancelled and refunded cannot be set here.
#[endpoint(
    tags("orders"),
    summary = "Set Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Status changed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Transition not allowed"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Forbidden"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.status",
    skip(order, json, depot),
    fields(order_uuid = tracing::field::Empty, status = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<SetStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    depot.admin_or_403()?;

    let state = depot.obtain_or_500::<Arc<State>>()?;
    let order = order.into_inner();
    let update = StatusUpdate::try_from(json.into_inner())?;

    let span = tracing::Span::current();

    span.record("order_uuid", tracing::field::display(order));
    span.record("status", update.status.as_str());

    let updated = state
        .app
        .orders
        .set_status(order.into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use shopfront_app::domain::orders::{OrdersServiceError, models::OrderUuid};

    use crate::test_helpers::{Mocks, admin, customer_owner, guest, make_order, service_as};

    use super::*;

    fn route() -> Router {
        Router::with_path("orders/{order}/status").put(handler)
    }

    #[tokio::test]
    async fn test_set_status_forwards_tracking_number() -> TestResult {
        let uuid = OrderUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_set_status()
            .once()
            .withf(move |order, update| {
                *order == uuid
                    && update.status == OrderStatus::Shipped
                    && update.tracking_number.as_deref() == Some("TRK-1")
            })
            .return_once(move |_, update| {
                let mut order = make_order(uuid, customer_owner());

                order.status = update.status;
                order.tracking_number = update.tracking_number;

                Ok(order)
            });

        let body: OrderResponse =
            TestClient::put(format!("http://example.com/orders/{uuid}/status"))
                .json(&json!({ "status": "shipped", "tracking_number": "TRK-1" }))
                .send(&service_as(admin(), mocks, route()))
                .await
                .take_json()
                .await?;

        assert_eq!(body.status, "shipped");
        assert_eq!(body.tracking_number.as_deref(), Some("TRK-1"));

        Ok(())
    }

    #[tokio::test]
    async fn test_set_status_to_cancelled_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_set_status()
            .once()
            .return_once(|_, _| {
                Err(OrdersServiceError::InvalidTransition {
                    status: OrderStatus::Pending,
                })
            });

        let res = TestClient::put(format!("http://example.com/orders/{}/status", Uuid::now_v7()))
            .json(&json!({ "status": "cancelled" }))
            .send(&service_as(admin(), mocks, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_status_returns_400() -> TestResult {
        let res = TestClient::put(format!("http://example.com/orders/{}/status", Uuid::now_v7()))
            .json(&json!({ "status": "lost" }))
            .send(&service_as(admin(), Mocks::default(), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_guests_cannot_set_status() -> TestResult {
        let res = TestClient::put(format!("http://example.com/orders/{}/status", Uuid::now_v7()))
            .json(&json!({ "status": "shipped" }))
            .send(&service_as(guest(), Mocks::default(), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
