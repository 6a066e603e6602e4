#![forbid(unsafe_code)]

//! Verifier interface and the result envelope shown by the form.
//!
//! The transport is not part of this crate. A host implements
//! [`OtcVerifier`] over whatever HTTP stack it runs on (the browser's
//! `fetch`, a native client) and the form drives it through [`graceful`],
//! which turns every outcome into an [`ApiResult`].

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown when the backend gives no usable reason.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Message shown when the code has empty cells.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

/// Outcome envelope shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResult<T> {
    /// Whether the call succeeded.
    pub success: bool,
    /// User-facing message. May be empty.
    pub message: String,
    /// Payload on success.
    pub data: Option<T>,
}

impl<T> ApiResult<T> {
    /// State before any submit: successful, no message, no data.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            success: true,
            message: String::new(),
            data: None,
        }
    }

    /// Successful outcome.
    #[must_use]
    pub fn ok(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    /// Failed outcome with `message` and no data.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

impl<T> Default for ApiResult<T> {
    fn default() -> Self {
        Self::initial()
    }
}

/// Body of a successful backend response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Backend message.
    #[serde(default)]
    pub message: String,
    /// Payload, if any.
    pub data: Option<T>,
}

/// Identity returned by a successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthData {
    /// User id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number, if known.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Failure of a verifier call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The backend answered with an error status.
    #[error("backend returned status {status}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// `message` from the error body, if it had one.
        message: Option<String>,
    },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Backend error from a status and an optional JSON error body.
    #[must_use]
    pub fn from_error_body(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            message: Option<String>,
        }

        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message);
        Self::Backend { status, message }
    }

    /// User-facing message carried by a backend error.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Backend {
                message: Some(message),
                ..
            } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Backend that checks a one-time code.
///
/// An HTTP implementation sends `GET` to
/// [`OtcConfig::verify_url`](crate::OtcConfig::verify_url), decodes a 2xx
/// body into [`ApiResponse<AuthData>`] and maps other statuses with
/// [`ClientError::from_error_body`].
pub trait OtcVerifier {
    /// Verify `code` (already sanitized and joined).
    fn verify(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<ApiResponse<AuthData>, ClientError>>;
}

impl<V: OtcVerifier + ?Sized> OtcVerifier for &V {
    fn verify(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<ApiResponse<AuthData>, ClientError>> {
        (**self).verify(code)
    }
}

/// Await `call` and fold its outcome into an [`ApiResult`].
///
/// Success keeps the backend's message and data. A backend error with a
/// message surfaces that message; anything else becomes
/// [`GENERIC_ERROR_MESSAGE`].
pub async fn graceful<T, F>(call: F) -> ApiResult<T>
where
    F: Future<Output = Result<ApiResponse<T>, ClientError>>,
{
    match call.await {
        Ok(response) => ApiResult::ok(response.message, response.data),
        Err(err) => {
            tracing::debug!(error = %err, "verifier call failed");
            ApiResult::failure(err.backend_message().unwrap_or(GENERIC_ERROR_MESSAGE))
        }
    }
}

/// Escape HTML-significant characters as entities, then trim whitespace.
#[must_use]
pub fn sanitize(input: &str) -> String {
    let escaped = v_htmlescape::escape(input).to_string();
    escaped
        .replace('`', "&#x60;")
        .replace('=', "&#x3D;")
        .trim()
        .to_string()
}

/// URL of the verify call for `code` against `endpoint`.
///
/// `endpoint` is usually [`OtcConfig::verify_endpoint`](crate::OtcConfig::verify_endpoint).
#[must_use]
pub fn verify_url(endpoint: &str, code: &str) -> String {
    format!("{endpoint}?otc={}", urlencoding::encode(code))
}
