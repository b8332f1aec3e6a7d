//! Money arithmetic shared by carts and orders.
//!
//! Intermediate values keep full precision. Rounding to cents happens once,
//! when an amount is surfaced.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept for surfaced amounts.
pub const MONEY_DP: u32 = 2;

/// Subtotals strictly above this ship for free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;

/// Flat shipping charge below the free-shipping threshold.
pub const FLAT_SHIPPING_COST: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

/// Sales tax applied to the discounted subtotal.
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Rounds to cents, halves away from zero.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Unit price after a percentage discount, unrounded.
#[must_use]
pub fn discounted_unit_price(unit_price: Decimal, discount_percent: Decimal) -> Decimal {
    unit_price * (Decimal::ONE - discount_percent / Decimal::ONE_HUNDRED)
}

/// `unitPrice * (1 - discount/100) * quantity`, unrounded.
#[must_use]
pub fn line_total(unit_price: Decimal, discount_percent: Decimal, quantity: u32) -> Decimal {
    discounted_unit_price(unit_price, discount_percent) * Decimal::from(quantity)
}

/// The pricing inputs of a single cart or order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub unit_price: Decimal,
    pub discount_percent: Decimal,
    pub quantity: u32,
}

impl PricedLine {
    #[must_use]
    pub fn gross(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    #[must_use]
    pub fn net(&self) -> Decimal {
        line_total(self.unit_price, self.discount_percent, self.quantity)
    }
}

/// Running, unrounded sums over a set of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub lines: u32,
    pub quantity: u64,
    pub gross: Decimal,
    pub net: Decimal,
}

impl Tally {
    pub fn add(&mut self, line: PricedLine) {
        self.lines += 1;
        self.quantity += u64::from(line.quantity);
        self.gross += line.gross();
        self.net += line.net();
    }

    #[must_use]
    pub fn totals(&self) -> LineTotals {
        let total_amount = round_money(self.gross);
        let total_discounted_amount = round_money(self.net);

        LineTotals {
            total_quantity: self.quantity,
            total_amount,
            total_discounted_amount,
            total_savings: total_amount - total_discounted_amount,
        }
    }

    #[must_use]
    pub fn charges(&self) -> OrderCharges {
        OrderCharges::for_subtotal(self.net)
    }
}

impl FromIterator<PricedLine> for Tally {
    fn from_iter<I: IntoIterator<Item = PricedLine>>(iter: I) -> Self {
        let mut tally = Self::default();

        for line in iter {
            tally.add(line);
        }

        tally
    }
}

/// Cart-level totals, rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineTotals {
    pub total_quantity: u64,
    pub total_amount: Decimal,
    pub total_discounted_amount: Decimal,
    pub total_savings: Decimal,
}

/// Subtotal, shipping, tax and grand total of an order, rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderCharges {
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderCharges {
    #[must_use]
    pub fn for_subtotal(subtotal: Decimal) -> Self {
        let shipping_cost = if subtotal > FREE_SHIPPING_THRESHOLD {
            Decimal::ZERO
        } else {
            FLAT_SHIPPING_COST
        };

        let tax = subtotal * TAX_RATE;

        Self {
            subtotal: round_money(subtotal),
            shipping_cost,
            tax: round_money(tax),
            total: round_money(subtotal + shipping_cost + tax),
        }
    }
}
