//! Remove Cart Line Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{carts::into_status_error, extensions::*, state::State};

/// Remove Cart Line Handler
#[endpoint(
    tags("carts"),
    summary = "Remove Cart Line",
    security(("bearer_auth" = []), ("session_id" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Line removed"),
        (status_code = StatusCode::NOT_FOUND, description = "Line not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    line: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.owner_or_400()?;

    state
        .app
        .carts
        .remove_line(&owner, line.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use shopfront_app::domain::carts::{CartsServiceError, models::CartLineUuid};

    use crate::test_helpers::{Mocks, anonymous, guest, guest_owner, service_as};

    use super::*;

    fn route() -> Router {
        Router::with_path("cart/lines/{line}").delete(handler)
    }

    #[tokio::test]
    async fn test_remove_line_returns_204() -> TestResult {
        let uuid = CartLineUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_remove_line()
            .once()
            .withf(move |owner, line| *owner == guest_owner() && *line == uuid)
            .return_once(|_, _| Ok(()));

        let res = TestClient::delete(format!("http://example.com/cart/lines/{uuid}"))
            .send(&service_as(guest(), mocks, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_unknown_line_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_remove_line()
            .once()
            .return_once(|_, _| Err(CartsServiceError::LineNotFound));

        let res = TestClient::delete(format!("http://example.com/cart/lines/{}", Uuid::now_v7()))
            .send(&service_as(guest(), mocks, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_line_without_owner_returns_400() -> TestResult {
        let res = TestClient::delete(format!("http://example.com/cart/lines/{}", Uuid::now_v7()))
            .send(&service_as(anonymous(), Mocks::default(), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
