//! Request-level logging, request IDs, and metrics.

mod request_ids;
mod routes;

use std::time::Instant;

use salvo::{
    Request, handler,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, error, info, warn};

use super::{metrics, settings};

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if req.uri().path() == "/metrics" {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();

    let request_id =
        request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER));

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());

    request_ids::set_request_id_header(res, &request_id);

    let method = req.method().to_string();
    let path = req.uri().path().to_owned();
    let route = routes::route_label(&path);
    let remote_addr = req.remote_addr().to_string();
    let _in_flight_request = metrics::InFlightRequestGuard::track();

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        request_id = %request_id,
        method = %method,
        route = %route,
        path = %path,
        remote_addr = %remote_addr,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty
    );

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    let duration = started.elapsed();
    let status = request_ids::response_status_or_ok(res.status_code);
    let duration_ms = duration.as_millis();
    let threshold = settings::slow_request_threshold();

    metrics::observe_request(&method, &route, status.as_u16(), duration.as_secs_f64());

    span.record("status", status.as_u16());
    span.record("duration_ms", duration_ms);

    span.in_scope(|| {
        info!(status = status.as_u16(), duration_ms, "request.completed");

        if status.is_server_error() {
            error!(
                status = status.as_u16(),
                method = %method,
                path = %path,
                request_id = %request_id,
                "server error response"
            );
        } else if status.is_client_error() {
            warn!(
                status = status.as_u16(),
                method = %method,
                path = %path,
                request_id = %request_id,
                "client error response"
            );
        }

        if duration > threshold {
            warn!(
                method = %method,
                path = %path,
                request_id = %request_id,
                duration_ms,
                threshold_ms = threshold.as_millis(),
                "slow request detected"
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use salvo::{
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    #[salvo::handler]
    async fn echo_request_id(depot: &mut Depot, res: &mut Response) {
        let request_id = depot
            .get::<String>(REQUEST_ID_DEPOT_KEY)
            .map_or_else(|_| "missing".to_string(), Clone::clone);

        res.render(request_id);
    }

    fn make_service() -> Service {
        Service::new(
            Router::new()
                .hoop(request_logging)
                .push(Router::with_path("cart").get(echo_request_id)),
        )
    }

    #[tokio::test]
    async fn incoming_request_id_is_propagated() -> TestResult {
        let mut res = TestClient::get("http://example.com/cart")
            .add_header(request_ids::REQUEST_ID_HEADER, "req-42", true)
            .send(&make_service())
            .await;

        let header = res
            .headers()
            .get(request_ids::REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);

        assert_eq!(header.as_deref(), Some("req-42"));
        assert_eq!(res.take_string().await?, "req-42");

        Ok(())
    }

    #[tokio::test]
    async fn missing_request_id_is_generated() -> TestResult {
        let mut res = TestClient::get("http://example.com/cart")
            .send(&make_service())
            .await;

        let body = res.take_string().await?;

        assert!(
            uuid::Uuid::parse_str(&body).is_ok(),
            "expected a generated uuid, got {body}"
        );

        Ok(())
    }
}
