//! Merge Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{get::CartResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Merge Cart Handler
///
/// Folds the active cart of the `X-Session-Id` guest session into the signed-in
/// user's cart. Quantities are summed and capped at available stock.
#[endpoint(
    tags("carts"),
    summary = "Merge Guest Cart",
    security(("bearer_auth" = [], "session_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Merged cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "No session to merge"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "carts.merge", skip(depot), fields(user_uuid = tracing::field::Empty), err)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    tracing::Span::current().record("user_uuid", tracing::field::display(user));

    let Some(session) = depot.identity_or_500()?.session.clone() else {
        return Err(StatusError::bad_request()
            .brief("session_required")
            .cause("an X-Session-Id header naming the guest session is required"));
    };

    let cart = state
        .app
        .carts
        .merge_session_cart(&session, user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
