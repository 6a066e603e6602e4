#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature the usual `tracing` macros are re-exported so
//! downstream crates can log through `otc_core::debug!` and friends. The
//! `tracing-json` feature adds subscriber setup for hosts that want to see
//! those logs: plain text for development, JSON lines for production. The
//! filter string uses `EnvFilter` syntax and `RUST_LOG` wins when set.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Failure to install a global subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingError(String);

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to initialize logging: {}", self.0)
    }
}

impl std::error::Error for LoggingError {}

#[cfg(feature = "tracing-json")]
fn env_filter(default_filter: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter))
}

/// Install a human-readable subscriber.
///
/// Returns an error if a global subscriber is already set.
#[cfg(feature = "tracing-json")]
pub fn init_logging(default_filter: &str) -> Result<(), LoggingError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_target(true)
        .try_init()
        .map_err(|e| LoggingError(e.to_string()))
}

/// Install a JSON-lines subscriber.
///
/// Returns an error if a global subscriber is already set.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging(default_filter: &str) -> Result<(), LoggingError> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter(default_filter))
        .with_current_span(true)
        .try_init()
        .map_err(|e| LoggingError(e.to_string()))
}
