//! Order Models

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        orders::status::{OrderStatus, PaymentStatus, UnknownStatus},
        owners::Owner,
        products::models::{Product, ProductUuid},
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Line UUID
pub type OrderLineUuid = TypedUuid<OrderLine>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    CashOnDelivery,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::Paypal => "paypal",
            Self::CashOnDelivery => "cash_on_delivery",
        }
    }

    /// Everything except cash on delivery is charged when the order is placed.
    #[must_use]
    pub const fn initial_payment_status(self) -> PaymentStatus {
        match self {
            Self::CashOnDelivery => PaymentStatus::Pending,
            Self::CreditCard | Self::DebitCard | Self::Paypal => PaymentStatus::Paid,
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "credit_card" => Ok(Self::CreditCard),
            "debit_card" => Ok(Self::DebitCard),
            "paypal" => Ok(Self::Paypal),
            "cash_on_delivery" => Ok(Self::CashOnDelivery),
            _ => Err(UnknownStatus(value.to_string())),
        }
    }
}

/// Postal address, copied into the order when it is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub full_name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<String>,
}

/// Catalog details frozen into an order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub title: String,
    pub description: String,
    pub brand: Option<String>,
    pub thumbnail: Option<String>,
    pub category: String,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            description: product.description.clone(),
            brand: product.brand.clone(),
            thumbnail: product.thumbnail.clone(),
            category: product.category.clone(),
        }
    }
}

/// Order Model
///
/// `total_amount` is the undiscounted sum of the lines. `discounted_total` is
/// what the customer pays, shipping and tax included.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub order_number: String,
    pub owner: Owner,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub payment_id: Option<String>,
    pub total_amount: Decimal,
    pub discounted_total: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub total_products: u32,
    pub total_quantity: u32,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
    pub estimated_delivery: Timestamp,
    pub delivered_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub lines: Vec<OrderLine>,
}

/// New Order Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub order_number: String,
    pub owner: Owner,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub payment_id: Option<String>,
    pub total_amount: Decimal,
    pub discounted_total: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub total_products: u32,
    pub total_quantity: u32,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub notes: Option<String>,
    pub estimated_delivery: Timestamp,
}

/// Order Line Model
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub uuid: OrderLineUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub snapshot: ProductSnapshot,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub discount_percentage: Decimal,
    pub discounted_price: Decimal,
    pub line_total: Decimal,
    pub created_at: Timestamp,
}

/// New Order Line Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderLine {
    pub uuid: OrderLineUuid,
    pub product_uuid: ProductUuid,
    pub snapshot: ProductSnapshot,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub discount_percentage: Decimal,
    pub discounted_price: Decimal,
    pub line_total: Decimal,
}

/// What the customer supplies at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkout {
    pub shipping_address: Address,

    /// Defaults to the shipping address.
    pub billing_address: Option<Address>,
    pub payment_method: PaymentMethod,
    pub payment_id: Option<String>,
    pub notes: Option<String>,
}

/// An administrative status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
}

/// The mutable part of an order, written by a compare-and-set on its status.
///
/// `None` keeps the stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    pub tracking_number: Option<String>,
    pub delivered_at: Option<Timestamp>,
    pub notes: Option<String>,
}

impl StatusChange {
    #[must_use]
    pub fn new(status: OrderStatus, payment_status: PaymentStatus) -> Self {
        Self {
            status,
            payment_status,
            payment_id: None,
            tracking_number: None,
            delivered_at: None,
            notes: None,
        }
    }
}
