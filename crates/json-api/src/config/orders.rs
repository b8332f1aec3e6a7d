//! Orders Config

use clap::{Args, ValueEnum};

use shopfront_app::domain::orders::status::TransitionPolicy;

/// Which administrative status changes are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OrderTransitions {
    /// Any move between non-cancelled states.
    Permissive,

    /// Single steps along pending, confirmed, processing, shipped, delivered.
    ForwardOnly,
}

impl From<OrderTransitions> for TransitionPolicy {
    fn from(value: OrderTransitions) -> Self {
        match value {
            OrderTransitions::Permissive => TransitionPolicy::Permissive,
            OrderTransitions::ForwardOnly => TransitionPolicy::ForwardOnly,
        }
    }
}

/// Order workflow settings.
#[derive(Debug, Args)]
pub struct OrdersConfig {
    /// Status transition policy (permissive, forward-only)
    #[arg(
        long,
        env = "ORDER_TRANSITIONS",
        value_enum,
        default_value_t = OrderTransitions::Permissive
    )]
    pub order_transitions: OrderTransitions,
}
