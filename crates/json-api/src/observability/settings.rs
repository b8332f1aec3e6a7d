//! Request logging settings, fixed at startup.

use std::{sync::OnceLock, time::Duration};

use crate::config::ServerConfig;

const DEFAULT_SLOW_REQUEST_THRESHOLD: Duration = Duration::from_secs(1);

static SLOW_REQUEST_THRESHOLD: OnceLock<Duration> = OnceLock::new();

pub(super) fn apply(config: &ServerConfig) {
    let _already_set = SLOW_REQUEST_THRESHOLD.set(Duration::from_millis(
        config.observability.slow_request_threshold_ms,
    ));
}

/// Requests taking longer than this are reported as slow.
pub(super) fn slow_request_threshold() -> Duration {
    SLOW_REQUEST_THRESHOLD
        .get()
        .copied()
        .unwrap_or(DEFAULT_SLOW_REQUEST_THRESHOLD)
}
