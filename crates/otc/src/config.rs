#![forbid(unsafe_code)]

//! Configuration for the one-time-code form.
//!
//! Every tunable lives in one [`OtcConfig`] that can be loaded from TOML or
//! JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # otc.toml
//! code_length = 6
//! seed_param = "otc"
//! api_base = "https://api.example.com"
//! ```
//!
//! ```rust,ignore
//! let config = OtcConfig::load_toml_file("otc.toml")?;
//! let config = OtcConfig::from_json_str(json)?.with_env_overrides();
//! ```
//!
//! # Defaults
//!
//! `OtcConfig::default()` is a six-cell code seeded from the `otc` query
//! parameter, verified at `/otc/verify` relative to an empty API base.

use std::path::Path;

use otc_core::DEFAULT_CODE_LENGTH;
#[cfg(feature = "tracing-json")]
use otc_core::logging::LoggingError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::verify_url;

/// Environment variable that overrides [`OtcConfig::api_base`].
pub const API_BASE_ENV: &str = "OTC_API_BASE_URL";

/// Longest code the form accepts.
pub const MAX_CODE_LENGTH: usize = 32;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtcConfig {
    /// Number of cells. Default: 6.
    pub code_length: usize,

    /// Query parameter that carries a prefilled code. Default: `otc`.
    pub seed_param: String,

    /// Backend origin, without trailing slash. Default: empty (same origin).
    pub api_base: String,

    /// Path of the verify endpoint. Default: `/otc/verify`.
    pub verify_path: String,

    /// `tracing` filter directive for hosts that install a subscriber.
    /// Default: `info`.
    pub log_filter: String,
}

impl Default for OtcConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            seed_param: "otc".to_string(),
            api_base: String::new(),
            verify_path: "/otc/verify".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl OtcConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Load a TOML file, apply environment overrides, and validate.
    pub fn load_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)?.with_env_overrides().validated()
    }

    /// Load a JSON file, apply environment overrides, and validate.
    pub fn load_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_file(path)?.with_env_overrides().validated()
    }

    /// Apply `OTC_API_BASE_URL` when it is set and non-empty.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_api_base_override(std::env::var(API_BASE_ENV).ok())
    }

    /// Replace `api_base` with `value` when it is present and non-empty.
    #[must_use]
    pub fn with_api_base_override(mut self, value: Option<String>) -> Self {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            tracing::debug!(api_base = %value, "api base overridden from environment");
            self.api_base = value.trim().to_string();
        }
        self
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.code_length == 0 || self.code_length > MAX_CODE_LENGTH {
            errors.push(format!(
                "code_length must be in [1, {MAX_CODE_LENGTH}], got {}",
                self.code_length
            ));
        }
        if self.seed_param.trim().is_empty() {
            errors.push("seed_param must not be empty".to_string());
        }
        if !self.api_base.is_empty()
            && !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://"))
        {
            errors.push(format!(
                "api_base must be empty or an http(s) URL, got {:?}",
                self.api_base
            ));
        }
        if !self.verify_path.starts_with('/') {
            errors.push(format!(
                "verify_path must start with '/', got {:?}",
                self.verify_path
            ));
        }
        if self.log_filter.trim().is_empty() {
            errors.push("log_filter must not be empty".to_string());
        }

        errors
    }

    /// `self` when [`validate`](Self::validate) finds nothing, else
    /// [`ConfigError::Validation`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Full URL of the verify endpoint, without query.
    #[must_use]
    pub fn verify_endpoint(&self) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), self.verify_path)
    }

    /// URL an HTTP verifier requests for `code`.
    #[must_use]
    pub fn verify_url(&self, code: &str) -> String {
        verify_url(&self.verify_endpoint(), code)
    }

    /// Install a human-readable subscriber filtered by `log_filter`.
    ///
    /// `RUST_LOG` wins when set.
    #[cfg(feature = "tracing-json")]
    pub fn init_logging(&self) -> Result<(), LoggingError> {
        otc_core::logging::init_logging(&self.log_filter)
    }

    /// Install a JSON-lines subscriber filtered by `log_filter`.
    #[cfg(feature = "tracing-json")]
    pub fn init_json_logging(&self) -> Result<(), LoggingError> {
        otc_core::logging::init_json_logging(&self.log_filter)
    }
}

/// Errors that can occur when loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parse error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation errors.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
