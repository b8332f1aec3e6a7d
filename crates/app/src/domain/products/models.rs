//! Product Models

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{domain::pricing::PricedLine, uuids::TypedUuid};

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub uuid: ProductUuid,
    pub title: String,
    pub description: String,
    pub brand: Option<String>,
    pub thumbnail: Option<String>,
    pub category: String,
    pub price: Decimal,
    pub discount_percentage: Decimal,
    pub stock: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    /// Prices `quantity` units at the current catalog price.
    #[must_use]
    pub fn priced(&self, quantity: u32) -> PricedLine {
        PricedLine {
            unit_price: self.price,
            discount_percent: self.discount_percentage,
            quantity,
        }
    }
}

/// New Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub title: String,
    pub description: String,
    pub brand: Option<String>,
    pub thumbnail: Option<String>,
    pub category: String,
    pub price: Decimal,
    pub discount_percentage: Decimal,
    pub stock: u32,
}

/// Product Update Model
///
/// Replaces the catalog details. Stock only moves through the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub title: String,
    pub description: String,
    pub brand: Option<String>,
    pub thumbnail: Option<String>,
    pub category: String,
    pub price: Decimal,
    pub discount_percentage: Decimal,
}
