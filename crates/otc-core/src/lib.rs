#![forbid(unsafe_code)]

//! Core: cell-targeted input events and the one-time-code sequence model.
//!
//! # Role in the workspace
//! `otc-core` is the input layer. It owns the normalized event types that the
//! segmented code widget consumes and the [`code::CodeSequence`] value that
//! the owning form hands to the widget.
//!
//! # Primary responsibilities
//! - **Event**: canonical per-cell input events (keys, input, paste, focus, click).
//! - **CodeChar / CodeSequence**: the `[A-Z0-9]` alphabet and the fixed-length
//!   cell sequence with its invariants.
//! - **Logging**: tracing re-exports and subscriber setup for hosts.
//!
//! # How it fits in the system
//! `otc-widgets` maps events onto pure transitions over a `CodeSequence`.
//! `otc-web` decodes browser events into these types, so it never has to know
//! how transitions work.

pub mod code;
pub mod event;
pub mod logging;

pub use code::{CodeChar, CodeError, CodeSequence, DEFAULT_CODE_LENGTH};
pub use event::{CellEvent, Event};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
