//! Money on the wire.
//!
//! Amounts travel as decimal strings so clients never see binary floats.

use std::str::FromStr;

use rust_decimal::Decimal;
use salvo::prelude::StatusError;

use shopfront_app::domain::pricing::{MONEY_DP, round_money};

use crate::extensions::*;

/// Two decimal places, always: `69.00`.
pub(crate) fn format_money(value: Decimal) -> String {
    let mut rounded = round_money(value);

    rounded.rescale(MONEY_DP);

    rounded.to_string()
}

/// Parses a request amount such as `"12.50"` or `"15"`.
pub(crate) fn parse_amount(value: &str, field: &str) -> Result<Decimal, StatusError> {
    Decimal::from_str(value.trim()).or_400(&format!("could not parse \"{field}\""))
}
