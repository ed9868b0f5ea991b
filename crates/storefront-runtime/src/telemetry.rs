//! # Telemetry
//!
//! Installs the global `tracing` subscriber.
//!
//! `RUST_LOG` wins over the configured filter so a single run can be made
//! noisier without touching the config file.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{RuntimeError, RuntimeResult};

/// Builds the filter: `RUST_LOG` if set and valid, else the configured one.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter))
}

/// Initializes the tracing subscriber for logging.
///
/// ## Errors
/// `Telemetry` if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> RuntimeResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .try_init()
        .map_err(|e| RuntimeError::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        let config = LoggingConfig::default();
        // Another test in this binary may already have installed one
        let _ = init_tracing(&config);
        assert!(matches!(
            init_tracing(&config),
            Err(RuntimeError::Telemetry(_))
        ));
    }
}
