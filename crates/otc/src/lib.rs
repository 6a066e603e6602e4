#![forbid(unsafe_code)]

//! One-time-code entry: public facade crate.
//!
//! This crate provides the stable surface area for apps. It re-exports the
//! event, sequence and widget types from the internal crates, adds the owning
//! [`OtcForm`], its [`OtcConfig`], and the [`OtcVerifier`] seam to the
//! backend, and offers a lightweight prelude.
//!
//! ```rust,ignore
//! use otc::prelude::*;
//!
//! let config = OtcConfig::load_toml_file("otc.toml")?;
//! let mut form = OtcForm::from_query(&config, "?otc=AB12CD")?;
//! form.mount_cell(0, handle);
//! form.handle(&CellEvent::input(0, "z"));
//! let submission = form.submit(&verifier, &mut session).await;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod session;

// --- Core re-exports -------------------------------------------------------

pub use otc_core::code::{CodeChar, CodeError, CodeSequence, DEFAULT_CODE_LENGTH};
pub use otc_core::event::{
    CellEvent, ClickEvent, Event, InputEvent, KeyCode, KeyEvent, KeyEventKind, Modifiers,
    MouseButton, PasteEvent,
};
#[cfg(feature = "tracing-json")]
pub use otc_core::logging::{LoggingError, init_json_logging, init_logging};

// --- Widget re-exports -----------------------------------------------------

pub use otc_widgets::{EventResult, FocusRegistry, Focusable, SegmentedCodeInput, Transition};

// --- Web re-exports --------------------------------------------------------

pub use otc_web::{DispatchOutcome, HostCommand, InputParseError, WebCodeInput};

// --- Facade ----------------------------------------------------------------

pub use client::{
    ApiResponse, ApiResult, AuthData, ClientError, OtcVerifier, graceful, sanitize, verify_url,
};
pub use config::{ConfigError, OtcConfig};
pub use error::{OtcError, Result};
pub use form::{OtcForm, Redirect, Submission};
pub use session::UserSession;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ApiResult, AuthData, CellEvent, CodeSequence, Event, Focusable, KeyCode, OtcConfig,
        OtcError, OtcForm, OtcVerifier, Redirect, Result, SegmentedCodeInput, UserSession,
    };

    pub use crate::{core, web, widgets};
}

pub use otc_core as core;
pub use otc_web as web;
pub use otc_widgets as widgets;
