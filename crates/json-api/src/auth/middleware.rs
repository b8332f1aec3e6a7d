//! Identity middleware.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::error;

use shopfront_app::{auth::AuthServiceError, domain::owners::SessionId};

use crate::{
    auth::{Identity, SESSION_ID_HEADER},
    extensions::*,
    state::State,
};

/// Resolves the caller. Requests without credentials continue anonymously;
/// routes that need an owner, a user or an admin check the identity themselves.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let session = match req.header::<String>(SESSION_ID_HEADER).map(SessionId::parse) {
        None => None,
        Some(Ok(session)) => Some(session),
        Some(Err(source)) => {
            res.render(
                StatusError::bad_request()
                    .brief("Invalid X-Session-Id header")
                    .cause(source.to_string()),
            );

            return;
        }
    };

    let principal = if req.headers().contains_key(AUTHORIZATION) {
        let Some(token) = extract_bearer_token(req) else {
            res.render(StatusError::unauthorized().brief("Missing or invalid Authorization header"));

            return;
        };

        let state = match depot.obtain::<Arc<State>>() {
            Ok(state) => state,
            Err(_error) => {
                res.render(StatusError::internal_server_error());

                return;
            }
        };

        match state.app.auth.authenticate_bearer(token).await {
            Ok(principal) => Some(principal),
            Err(AuthServiceError::NotFound) => {
                res.render(StatusError::unauthorized().brief("Invalid API token"));

                return;
            }
            Err(AuthServiceError::Token(source)) => {
                error!("failed to process api token: {source}");

                res.render(StatusError::internal_server_error());

                return;
            }
            Err(AuthServiceError::Storage(source)) => {
                error!("failed to validate api token: {source}");

                res.render(StatusError::internal_server_error());

                return;
            }
        }
    } else {
        None
    };

    depot.insert_identity(Identity { principal, session });

    ctrl.call_next(req, depot, res).await;
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
