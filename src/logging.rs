//! Tracing initialization for liftlog
//!
//! All diagnostics go through `tracing`; this module wires up the
//! subscriber from the logging configuration.

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Logging initialization errors
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Failed to install the tracing subscriber
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}

/// Initialize the global tracing subscriber
///
/// The level filter comes from `logging.level`; `logging.format` selects
/// between JSON and human-readable output. Call once at startup.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), LoggingError> {
    let level = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    if config.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| LoggingError::Init(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| LoggingError::Init(e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test 1: initialization succeeds at most once per process
    #[test]
    fn test_init_tracing_once() {
        let config = LoggingConfig::default();

        let first = init_tracing(&config);
        let second = init_tracing(&config);

        // One of the two must fail with Init; the global subscriber can
        // only be installed once.
        assert!(first.is_ok() || matches!(first, Err(LoggingError::Init(_))));
        assert!(second.is_err());
    }
}
