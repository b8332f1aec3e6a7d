//! Human-readable order numbers.

use jiff::Timestamp;
use mockall::automock;
use rand::{Rng, distributions::Alphanumeric};

const SUFFIX_LEN: usize = 6;

/// Source of order numbers. Uniqueness is enforced by storage, not here.
#[automock]
pub trait OrderNumbers: Send + Sync {
    fn next_number(&self) -> String;
}

/// `ORD-<unix millis>-<6 uppercase alphanumerics>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampOrderNumbers;

impl OrderNumbers for TimestampOrderNumbers {
    fn next_number(&self) -> String {
        format_order_number(Timestamp::now(), &random_suffix())
    }
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|byte| char::from(byte).to_ascii_uppercase())
        .collect()
}

fn format_order_number(now: Timestamp, suffix: &str) -> String {
    format!("ORD-{}-{suffix}", now.as_millisecond())
}
