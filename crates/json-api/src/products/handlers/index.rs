//! Product Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, products::get::ProductResponse, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// The list of products
    pub products: Vec<ProductResponse>,
}

/// Product Index Handler
///
/// Returns the catalog.
#[endpoint(tags("products"), summary = "List Products")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let products = state
        .app
        .products
        .list_products()
        .await
        .or_500("failed to fetch products")?;

    Ok(Json(ProductsResponse {
        products: products.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use shopfront_app::{
        domain::products::{ProductsServiceError, models::ProductUuid},
        storage::RepositoryError,
    };

    use crate::test_helpers::{Mocks, anonymous, make_product, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(
            anonymous(),
            mocks,
            Router::with_path("products").get(handler),
        )
    }

    #[tokio::test]
    async fn test_index_returns_empty_list() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_list_products()
            .once()
            .return_once(|| Ok(vec![]));

        let response: ProductsResponse = TestClient::get("http://example.com/products")
            .send(&make_service(mocks))
            .await
            .take_json()
            .await?;

        assert!(response.products.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_index_returns_products_in_order() -> TestResult {
        let uuid_a = ProductUuid::new();
        let uuid_b = ProductUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_list_products()
            .once()
            .return_once(move || Ok(vec![make_product(uuid_a), make_product(uuid_b)]));

        let response: ProductsResponse = TestClient::get("http://example.com/products")
            .send(&make_service(mocks))
            .await
            .take_json()
            .await?;

        let uuids: Vec<_> = response.products.iter().map(|product| product.uuid).collect();

        assert_eq!(uuids, vec![uuid_a.into_uuid(), uuid_b.into_uuid()]);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_storage_error_returns_500() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_list_products()
            .once()
            .return_once(|| Err(ProductsServiceError::Storage(RepositoryError::InvalidData)));

        let res = TestClient::get("http://example.com/products")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
