//! Add Cart Line Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    carts::{get::CartLineResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Add Cart Line Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartLineRequest {
    pub product_uuid: Uuid,

    /// Units to add, at least 1
    pub quantity: u32,
}

/// Add Cart Line Handler
///
/// Adds a product at its current price. Adding a product that is already in
/// the cart increases that line instead.
#[endpoint(
    tags("carts"),
    summary = "Add Cart Line",
    security(("bearer_auth" = []), ("session_id" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Line added"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request or insufficient stock"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.lines.create",
    skip(json, depot, res),
    fields(owner = tracing::field::Empty, product_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartLineRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartLineResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.owner_or_400()?;
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("owner", tracing::field::display(&owner));
    span.record("product_uuid", tracing::field::display(request.product_uuid));

    let line = state
        .app
        .carts
        .add_line(&owner, request.product_uuid.into(), request.quantity)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(line.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use shopfront_app::domain::{
        carts::{CartsServiceError, models::CartUuid},
        products::models::ProductUuid,
    };

    use crate::test_helpers::{Mocks, guest, guest_owner, make_line, service_as};

    use super::*;

    fn route() -> Router {
        Router::with_path("cart/lines").post(handler)
    }

    #[tokio::test]
    async fn test_add_line_returns_201_with_snapshot() -> TestResult {
        let product = ProductUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_add_line()
            .once()
            .withf(move |owner, p, quantity| {
                *owner == guest_owner() && *p == product && *quantity == 3
            })
            .return_once(move |_, p, quantity| Ok(make_line(CartUuid::new(), p, quantity)));

        let mut res = TestClient::post("http://example.com/cart/lines")
            .json(&json!({ "product_uuid": product.into_uuid(), "quantity": 3 }))
            .send(&service_as(guest(), mocks, route()))
            .await;

        let body: CartLineResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.quantity, 3);
        assert_eq!(body.price_at_time, "40.00");
        assert_eq!(body.discount_at_time, "25");
        assert_eq!(body.line_total, "90.00");

        Ok(())
    }

    #[tokio::test]
    async fn test_add_line_past_stock_returns_400() -> TestResult {
        let product = ProductUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_add_line()
            .once()
            .return_once(move |_, _, _| {
                Err(CartsServiceError::InsufficientStock {
                    product,
                    available: 1,
                })
            });

        let res = TestClient::post("http://example.com/cart/lines")
            .json(&json!({ "product_uuid": product.into_uuid(), "quantity": 3 }))
            .send(&service_as(guest(), mocks, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_line_unknown_product_returns_404() -> TestResult {
        let product = ProductUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_add_line()
            .once()
            .return_once(move |_, _, _| Err(CartsServiceError::ProductNotFound(product)));

        let res = TestClient::post("http://example.com/cart/lines")
            .json(&json!({ "product_uuid": product.into_uuid(), "quantity": 1 }))
            .send(&service_as(guest(), mocks, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
