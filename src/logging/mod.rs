//! Structured logging bootstrap.
//!
//! Installs the process-wide `tracing` subscriber the way a service entry
//! point expects to: JSON records for log shippers or human-readable output
//! for terminals, with the filter taken from configuration, `RUST_LOG`, or
//! an `info` fallback.
//!
//! # Example
//!
//! ```rust,ignore
//! use svckit::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig::new().with_json_format(true);
//! init_logging(&config)?;
//! tracing::info!(port = 8080, "service starting");
//! ```

use serde::{Deserialize, Serialize};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::error::{Result, SvckitError};

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Emit records as JSON objects instead of human-readable lines.
    #[serde(default)]
    pub json_format: bool,

    /// Filter directive (e.g. `"info"`, `"svckit=debug"`). Falls back to
    /// `RUST_LOG`, then `"info"`.
    #[serde(default)]
    pub filter: Option<String>,
}

impl LogConfig {
    /// Create a configuration with human-readable output and the default
    /// filter chain.
    pub fn new() -> Self {
        Self {
            json_format: false,
            filter: None,
        }
    }

    /// Enable or disable JSON output.
    pub fn with_json_format(mut self, enable: bool) -> Self {
        self.json_format = enable;
        self
    }

    /// Set an explicit filter directive.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Install the global tracing subscriber.
///
/// May be called once per process; a second call fails with
/// [`SvckitError::Logging`] instead of panicking so startup code can decide
/// how loud to be about it.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = config
        .filter
        .clone()
        .unwrap_or_else(|| std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()));

    let result = if config.json_format {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .try_init()
    };

    result.map_err(|e| SvckitError::Logging(e.to_string()))
}

/// Per-request tracing middleware for an HTTP service.
///
/// The layer opens a span per request so handlers and helpers (such as
/// [`crate::server::authenticated_userid`]) can attach fields like the
/// authenticated user id to everything logged while serving it.
pub fn request_trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}
