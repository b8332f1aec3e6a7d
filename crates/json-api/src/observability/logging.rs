//! Log subscriber.

use tracing_subscriber::{
    EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::{ServerConfig, observability::LogFormat};

use super::ObservabilityError;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Noisy dependencies are held at `warn` unless `RUST_LOG` says otherwise.
fn default_directives(level: &str) -> String {
    format!("{level},h2=warn,hyper=warn,sqlx=warn")
}

fn fmt_layer(format: LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
    }
}

pub(super) fn init_subscriber(config: &ServerConfig) -> Result<(), ObservabilityError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.logging.log_level)));

    tracing_subscriber::registry()
        .with(fmt_layer(config.logging.log_format))
        .with(filter)
        .try_init()?;

    Ok(())
}
