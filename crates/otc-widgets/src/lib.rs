#![forbid(unsafe_code)]

//! Segmented one-time-code input.
//!
//! The widget is split the way the rest of the stack is:
//!
//! - [`code_input`] and [`paste`]: pure transition functions. They take the
//!   current [`CodeSequence`](otc_core::CodeSequence) and active index and
//!   return the next ones. No focus, no callbacks.
//! - [`focus`]: the handle registry that maps a cell index to something that
//!   can take input focus.
//! - [`segmented`]: the controller that routes events to transitions, hands
//!   edits to the owner, and moves focus afterwards.

pub mod code_input;
pub mod focus;
pub mod paste;
pub mod segmented;

pub use code_input::Transition;
pub use focus::{FocusRegistry, Focusable};
pub use segmented::{EventResult, SegmentedCodeInput};
