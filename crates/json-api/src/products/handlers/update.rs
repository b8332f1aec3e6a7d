//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use shopfront_app::domain::products::models::ProductUpdate;

use crate::{
    extensions::*,
    products::{ProductDetailsRequest, get::ProductResponse, into_status_error},
    state::State,
};

/// Product Update Handler
///
/// Replaces the catalog details. Carts and orders keep the prices they
/// captured.
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Forbidden"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.update",
    skip(product, json, depot),
    fields(product_uuid = tracing::field::Empty, price = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<ProductDetailsRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    depot.admin_or_403()?;

    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = product.into_inner();
    let update = ProductUpdate::try_from(json.into_inner())?;

    let span = tracing::Span::current();

    span.record("product_uuid", tracing::field::display(product));
    span.record("price", tracing::field::display(update.price));

    let updated = state
        .app
        .products
        .update_product(product.into(), update)
        .await
        .map_err(into_status_error)?;

    tracing::info!(product_uuid = %product, price = %updated.price, "updated product");

    Ok(Json(updated.into()))
}
