//! Graceful shutdown

use std::{io, time::Duration};

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;
use tracing::info;

#[derive(Debug, Error)]
pub(crate) enum ShutdownSignalError {
    #[error("failed to install {signal} handler: {source}")]
    Install {
        signal: &'static str,
        #[source]
        source: io::Error,
    },
}

async fn ctrl_c() -> Result<&'static str, ShutdownSignalError> {
    signal::ctrl_c()
        .await
        .map_err(|source| ShutdownSignalError::Install {
            signal: "ctrl-c",
            source,
        })?;

    Ok("ctrl-c")
}

#[cfg(unix)]
async fn terminate() -> Result<&'static str, ShutdownSignalError> {
    signal::unix::signal(signal::unix::SignalKind::terminate())
        .map_err(|source| ShutdownSignalError::Install {
            signal: "SIGTERM",
            source,
        })?
        .recv()
        .await;

    Ok("SIGTERM")
}

#[cfg(not(unix))]
async fn terminate() -> Result<&'static str, ShutdownSignalError> {
    std::future::pending().await
}

/// Waits for Ctrl+C or SIGTERM, then stops accepting connections and gives
/// in-flight requests `grace` to finish.
pub(crate) async fn listen(handle: ServerHandle, grace: Duration) -> Result<(), ShutdownSignalError> {
    let received = tokio::select! {
        result = ctrl_c() => result?,
        result = terminate() => result?,
    };

    info!(signal = received, grace_secs = grace.as_secs(), "shutting down");

    handle.stop_graceful(Some(grace));

    Ok(())
}
