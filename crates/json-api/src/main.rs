//! Shopfront JSON API Server

use std::process;

use salvo::{
    affix_state::inject,
    oapi::{
        OpenApi,
        security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info, warn};

use shopfront_app::{context::AppContext, domain::orders::status::TransitionPolicy};

use crate::{
    auth::SESSION_ID_HEADER,
    config::ServerConfig,
    state::{State, StorageBackend},
};

mod auth;
mod carts;
mod config;
mod errors;
mod extensions;
mod healthcheck;
mod money;
mod observability;
mod orders;
mod products;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Shopfront JSON API Server entry point
///
/// # Panics
///
/// Panics if the server fails to bind or serve requests
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    if let Err(init_error) = observability::init(&config) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialize, must use eprintln"
        )]
        {
            eprintln!("Observability error: {init_error}");
        }

        process::exit(1);
    }

    let policy = TransitionPolicy::from(config.orders.order_transitions);

    let state = if let Some(database_url) = &config.database.database_url {
        match AppContext::from_database_url(database_url, policy).await {
            Ok(app) => State::new(app, StorageBackend::Postgres),
            Err(init_error) => {
                error!("failed to initialize app context: {init_error}");

                process::exit(1);
            }
        }
    } else {
        warn!("DATABASE_URL is not set, serving from in-memory storage");

        State::new(AppContext::in_memory(policy), StorageBackend::Memory)
    };

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let mut router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(inject(state))
        .hoop(observability::request_logging);

    if config.observability.metrics_enabled {
        router = router.push(Router::with_path("metrics").get(observability::metrics_handler));
    }

    let router = router
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(router::app_router());

    let doc = OpenApi::new("Shopfront API", env!("CARGO_PKG_VERSION"))
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .add_security_scheme(
            "session_id",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(SESSION_ID_HEADER))),
        )
        .merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();
    let grace = config.server.shutdown_grace();

    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle, grace).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(router).await;
}
