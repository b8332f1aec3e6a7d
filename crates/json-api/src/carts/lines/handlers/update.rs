//! Update Cart Line Handler

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
    carts::{get::CartLineResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Update Cart Line Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartLineRequest {
    /// The new quantity, at least 1
    pub quantity: u32,
}

/// Update Cart Line Handler
///
/// Replaces a line's quantity. The captured price is kept.
#[endpoint(
    tags("carts"),
    summary = "Update Cart Line",
    security(("bearer_auth" = []), ("session_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Line updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request or insufficient stock"),
        (status_code = StatusCode::NOT_FOUND, description = "Line not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    line: PathParam<Uuid>,
    json: JsonBody<UpdateCartLineRequest>,
    depot: &mut Depot,
) -> Result<Json<CartLineResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.owner_or_400()?;

    let line = state
        .app
        .carts
        .set_line_quantity(&owner, line.into_inner().into(), json.into_inner().quantity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(line.into()))
}
