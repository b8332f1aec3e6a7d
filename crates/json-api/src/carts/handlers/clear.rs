//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{carts::into_status_error, extensions::*, state::State};

/// Clear Cart Handler
///
/// Removes every line from the caller's cart.
#[endpoint(
    tags("carts"),
    summary = "Clear Cart",
    security(("bearer_auth" = []), ("session_id" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Cart emptied"),
        (status_code = StatusCode::BAD_REQUEST, description = "No user or session"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.owner_or_400()?;

    state
        .app
        .carts
        .clear(&owner)
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
