//! Create Product Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use shopfront_app::domain::products::models::{NewProduct, ProductUuid};

use crate::{
    extensions::*,
    money::parse_amount,
    products::{get::ProductResponse, into_status_error},
    state::State,
};

/// Create Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateProductRequest {
    pub title: String,

    #[serde(default)]
    pub description: String,

    pub brand: Option<String>,

    pub thumbnail: Option<String>,

    pub category: String,

    /// Unit price as a decimal string, e.g. `"19.99"`
    pub price: String,

    /// Percentage discount between 0 and 100, as a decimal string
    pub discount_percentage: Option<String>,

    /// Opening stock
    #[serde(default)]
    pub stock: u32,
}

impl TryFrom<CreateProductRequest> for NewProduct {
    type Error = StatusError;

    fn try_from(request: CreateProductRequest) -> Result<Self, Self::Error> {
        let price = parse_amount(&request.price, "price")?;
        let discount_percentage = match request.discount_percentage.as_deref() {
            Some(value) => parse_amount(value, "discount_percentage")?,
            None => rust_decimal::Decimal::ZERO,
        };

        Ok(NewProduct {
            uuid: ProductUuid::new(),
            title: request.title,
            description: request.description,
            brand: request.brand,
            thumbnail: request.thumbnail,
            category: request.category,
            price,
            discount_percentage,
            stock: request.stock,
        })
    }
}

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::CONFLICT, description = "Product already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::FORBIDDEN, description = "Forbidden"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.create",
    skip(json, depot, res),
    fields(product_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, StatusError> {
    depot.admin_or_403()?;

    let state = depot.obtain_or_500::<Arc<State>>()?;
    let new_product = NewProduct::try_from(json.into_inner())?;

    tracing::Span::current().record("product_uuid", tracing::field::display(new_product.uuid));

    let product = state
        .app
        .products
        .create_product(new_product)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/products/{}", product.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(product.into()))
}
