#![forbid(unsafe_code)]

//! Top-level error type for the facade.

use otc_core::CodeError;
use otc_web::InputParseError;
use thiserror::Error;

use crate::client::ClientError;
use crate::config::ConfigError;

/// Standard result type for facade APIs.
pub type Result<T> = std::result::Result<T, OtcError>;

/// Any failure surfaced by the facade.
#[derive(Debug, Error)]
pub enum OtcError {
    /// Configuration could not be loaded or is invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The code sequence could not be built.
    #[error("invalid code: {0}")]
    Code(#[from] CodeError),

    /// A host-encoded event could not be parsed.
    #[error("input parse error: {0}")]
    Input(#[from] InputParseError),

    /// The verifier failed.
    #[error("client error: {0}")]
    Client(#[from] ClientError),
}
