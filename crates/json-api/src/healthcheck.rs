//! Healthcheck Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State};

/// Healthcheck response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct HealthResponse {
    pub status: String,

    /// `postgres`, or `memory` when running without a database
    pub storage: String,

    pub version: String,
}

/// Healthcheck handler
#[endpoint(tags("health"), summary = "Health check endpoint")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<HealthResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        storage: state.storage.as_str().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, anonymous, service_as};

    use super::*;

    #[tokio::test]
    async fn test_healthcheck_reports_storage() -> TestResult {
        let response: HealthResponse = TestClient::get("http://example.com/healthcheck")
            .send(&service_as(
                anonymous(),
                Mocks::default(),
                Router::with_path("healthcheck").get(handler),
            ))
            .await
            .take_json()
            .await?;

        assert_eq!(response.status, "ok");
        assert_eq!(response.storage, "memory");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));

        Ok(())
    }
}
