//! Restock Product Handler

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
    products::{get::ProductResponse, into_status_error},
    state::State,
};

/// Restock Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RestockRequest {
    /// Units to add, at least 1
    pub quantity: u32,
}

/// Restock Product Handler
///
/// Adds units to a product's stock.
#[endpoint(
    tags("products"),
    summary = "Restock Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product restocked"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Forbidden"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.restock",
    skip(product, json, depot),
    fields(product_uuid = tracing::field::Empty, quantity = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<RestockRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    depot.admin_or_403()?;

    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = product.into_inner();
    let quantity = json.into_inner().quantity;

    let span = tracing::Span::current();

    span.record("product_uuid", tracing::field::display(product));
    span.record("quantity", quantity);

    let product = state
        .app
        .products
        .restock(product.into(), quantity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use shopfront_app::domain::products::{ProductsServiceError, models::ProductUuid};

    use crate::test_helpers::{Mocks, admin, customer, make_product, service_as};

    use super::*;

    fn route() -> Router {
        Router::with_path("products/{product}/restock").post(handler)
    }

    #[tokio::test]
    async fn test_restock_returns_new_stock() -> TestResult {
        let uuid = ProductUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_restock()
            .once()
            .withf(move |u, quantity| *u == uuid && *quantity == 5)
            .return_once(move |_, _| {
                let mut product = make_product(uuid);

                product.stock = 12;

                Ok(product)
            });

        let body: ProductResponse =
            TestClient::post(format!("http://example.com/products/{uuid}/restock"))
                .json(&json!({ "quantity": 5 }))
                .send(&service_as(admin(), mocks, route()))
                .await
                .take_json()
                .await?;

        assert_eq!(body.stock, 12);

        Ok(())
    }

    #[tokio::test]
    async fn test_restock_zero_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_restock()
            .once()
            .return_once(|_, _| Err(ProductsServiceError::InvalidQuantity));

        let res = TestClient::post(format!("http://example.com/products/{}/restock", Uuid::now_v7()))
            .json(&json!({ "quantity": 0 }))
            .send(&service_as(admin(), mocks, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_restock_requires_admin() -> TestResult {
        let res = TestClient::post(format!("http://example.com/products/{}/restock", Uuid::now_v7()))
            .json(&json!({ "quantity": 5 }))
            .send(&service_as(customer(), Mocks::default(), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
