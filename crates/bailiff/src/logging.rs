//! Tracing subscriber setup for the binary.

use crate::LoggingConfig;
use bailiff_error::{BailiffResult, ConfigError, ConfigErrorKind};
use tracing_subscriber::EnvFilter;

/// Default filter directive for the given verbosity.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `verbose` when set.
///
/// # Errors
///
/// Returns a configuration error if a subscriber is already installed.
pub fn init_logging(verbose: bool, config: &LoggingConfig) -> BailiffResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let result = if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
    };

    result.map_err(|e| ConfigError::new(ConfigErrorKind::Logging(e.to_string())).into())
}
