//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shopfront_app::domain::products::models::Product;

use crate::{extensions::*, money::format_money, products::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    pub title: String,

    pub description: String,

    pub brand: Option<String>,

    pub thumbnail: Option<String>,

    pub category: String,

    /// Current catalog price
    pub price: String,

    /// Current catalog discount, in percent
    pub discount_percentage: String,

    /// Units available to order
    pub stock: u32,

    /// The date and time the product was created
    pub created_at: String,

    /// The date and time the product was last updated
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            uuid: product.uuid.into_uuid(),
            title: product.title,
            description: product.description,
            brand: product.brand,
            thumbnail: product.thumbnail,
            category: product.category,
            price: format_money(product.price),
            discount_percentage: product.discount_percentage.normalize().to_string(),
            stock: product.stock,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

/// Get Product Handler
///
/// Returns a product.
#[endpoint(
    tags("products"),
    summary = "Get Product",
    responses(
        (status_code = StatusCode::OK, description = "Product found"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .products
        .get_product(product.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use shopfront_app::domain::products::{ProductsServiceError, models::ProductUuid};

    use crate::test_helpers::{Mocks, anonymous, make_product, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(
            anonymous(),
            mocks,
            Router::with_path("products/{product}").get(handler),
        )
    }

    #[tokio::test]
    async fn test_get_product_renders_money_as_strings() -> TestResult {
        let uuid = ProductUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_get_product()
            .once()
            .withf(move |product| *product == uuid)
            .return_once(move |_| Ok(make_product(uuid)));

        let body: ProductResponse = TestClient::get(format!("http://example.com/products/{uuid}"))
            .send(&make_service(mocks))
            .await
            .take_json()
            .await?;

        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.price, "40.00");
        assert_eq!(body.discount_percentage, "25");
        assert_eq!(body.stock, 7);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_product_not_found_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_get_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/products/{}", Uuid::now_v7()))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_product_invalid_uuid_returns_400() -> TestResult {
        let res = TestClient::get("http://example.com/products/123")
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
