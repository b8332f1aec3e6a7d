//! Product Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod restock;
pub(crate) mod update;

use rust_decimal::Decimal;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};

use shopfront_app::domain::products::models::ProductUpdate;

use crate::money::parse_amount;

/// Catalog details accepted when creating or editing a product.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductDetailsRequest {
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
}

impl ProductDetailsRequest {
    fn discount(&self) -> Result<Decimal, StatusError> {
        self.discount_percentage
            .as_deref()
            .map_or(Ok(Decimal::ZERO), |value| {
                parse_amount(value, "discount_percentage")
            })
    }
}

impl TryFrom<ProductDetailsRequest> for ProductUpdate {
    type Error = StatusError;

    fn try_from(request: ProductDetailsRequest) -> Result<Self, Self::Error> {
        let price = parse_amount(&request.price, "price")?;
        let discount_percentage = request.discount()?;

        Ok(ProductUpdate {
            title: request.title,
            description: request.description,
            brand: request.brand,
            thumbnail: request.thumbnail,
            category: request.category,
            price,
            discount_percentage,
        })
    }
}
