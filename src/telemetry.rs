//! # Telemetry
//!
//! Tracing subscriber setup. `RUST_LOG` takes precedence over the
//! configured level.

use crate::application::error::InfrastructureError;
use crate::config::LogConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Builds the filter from `RUST_LOG`, falling back to `config.level`.
///
/// # Errors
///
/// Returns `InfrastructureError::Configuration` if the configured level is
/// not a valid filter directive.
pub fn filter(config: &LogConfig) -> Result<EnvFilter, InfrastructureError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| InfrastructureError::configuration(format!("log level: {e}")))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns `InfrastructureError::Configuration` for an invalid level or if
/// a global subscriber is already installed.
pub fn init(config: &LogConfig) -> Result<(), InfrastructureError> {
    let filter = filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    result.map_err(|e| InfrastructureError::configuration(e.to_string()))
}
