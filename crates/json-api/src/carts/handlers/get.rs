//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shopfront_app::domain::carts::models::{Cart, CartLine};

use crate::{carts::into_status_error, extensions::*, money::format_money, state::State};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    /// `user:<uuid>` or `session:<id>`
    pub owner: String,

    pub lines: Vec<CartLineResponse>,

    pub total_quantity: u64,

    /// Sum of the captured prices before discounts
    pub total_amount: String,

    /// Sum of the captured prices after discounts
    pub total_discounted_amount: String,

    pub total_savings: String,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        let totals = cart.totals();

        CartResponse {
            uuid: cart.uuid.into_uuid(),
            owner: cart.owner.to_string(),
            lines: cart.lines.into_iter().map(CartLineResponse::from).collect(),
            total_quantity: totals.total_quantity,
            total_amount: format_money(totals.total_amount),
            total_discounted_amount: format_money(totals.total_discounted_amount),
            total_savings: format_money(totals.total_savings),
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    /// The unique identifier of the cart line
    pub uuid: Uuid,

    pub product_uuid: Uuid,

    pub quantity: u32,

    /// Unit price captured when the product was added
    pub price_at_time: String,

    /// Discount captured when the product was added, in percent
    pub discount_at_time: String,

    pub line_total: String,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        Self {
            uuid: line.uuid.into_uuid(),
            product_uuid: line.product_uuid.into_uuid(),
            quantity: line.quantity,
            price_at_time: format_money(line.price_at_time),
            discount_at_time: line.discount_at_time.normalize().to_string(),
            line_total: format_money(line.line_total()),
        }
    }
}

/// Get Cart Handler
///
/// Returns the caller's active cart, creating an empty one on first access.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    security(("bearer_auth" = []), ("session_id" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Active cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "No user or session"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.owner_or_400()?;

    let cart = state
        .app
        .carts
        .get_or_create_active_cart(&owner)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
