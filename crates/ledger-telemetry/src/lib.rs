//! # Ledger Telemetry
//!
//! Logging and metrics for the ledger node.
//!
//! ## Components
//!
//! - Structured logs through `tracing-subscriber` (pretty or JSON)
//! - Prometheus metrics, exported as text for a `/metrics` scrape
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{TelemetryConfig, init_telemetry};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())?;
//!     // application code
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LEDGER_SERVICE_NAME` | `dpos-ledger` | Service name in the startup log |
//! | `LEDGER_LOG_LEVEL` | `info` | Log filter, falls back to `RUST_LOG` |
//! | `LEDGER_JSON_LOGS` | `false` | JSON log output |
//! | `LEDGER_METRICS_ENABLED` | `true` | Register and export metrics |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};
pub use metrics::{
    encode_metrics, register_metrics, CHAIN_HEIGHT, ELECTIONS, HTTP_REQUESTS,
    HTTP_REQUEST_DURATION,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and, if enabled, the metrics registry.
///
/// Returns a guard that should be held for the lifetime of the process.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    if config.metrics_enabled {
        register_metrics()?;
    }
    logging::init_logging(&config)?;

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TelemetryError::Config("bad level".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: bad level");
    }
}
