//! Cart Models

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    domain::{
        owners::Owner,
        pricing::{LineTotals, PricedLine, Tally, round_money},
        products::models::ProductUuid,
    },
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Cart Line UUID
pub type CartLineUuid = TypedUuid<CartLine>;

/// Cart Model
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub uuid: CartUuid,
    pub owner: Owner,
    pub is_active: bool,
    pub lines: Vec<CartLine>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Cart {
    #[must_use]
    pub fn totals(&self) -> LineTotals {
        compute_totals(&self.lines)
    }
}

/// New Cart Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewCart {
    pub uuid: CartUuid,
    pub owner: Owner,
}

/// Cart Line Model
///
/// `price_at_time` and `discount_at_time` are captured when the product is
/// first added and never refreshed.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub uuid: CartLineUuid,
    pub cart_uuid: CartUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub price_at_time: Decimal,
    pub discount_at_time: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartLine {
    #[must_use]
    pub fn priced(&self) -> PricedLine {
        PricedLine {
            unit_price: self.price_at_time,
            discount_percent: self.discount_at_time,
            quantity: self.quantity,
        }
    }

    #[must_use]
    pub fn line_total(&self) -> Decimal {
        round_money(self.priced().net())
    }
}

/// New Cart Line Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartLine {
    pub uuid: CartLineUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub price_at_time: Decimal,
    pub discount_at_time: Decimal,
}

impl NewCartLine {
    /// A line that carries over the snapshot of an existing line.
    #[must_use]
    pub fn copy_of(line: &CartLine) -> Self {
        Self {
            uuid: CartLineUuid::new(),
            product_uuid: line.product_uuid,
            quantity: line.quantity,
            price_at_time: line.price_at_time,
            discount_at_time: line.discount_at_time,
        }
    }
}

/// Sums a cart's lines using their captured prices.
#[must_use]
pub fn compute_totals(lines: &[CartLine]) -> LineTotals {
    lines.iter().map(CartLine::priced).collect::<Tally>().totals()
}
