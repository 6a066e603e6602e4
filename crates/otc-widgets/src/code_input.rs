#![forbid(unsafe_code)]

//! Pure transition functions for a segmented code input.
//!
//! Each function maps the current sequence, the active index and one event to
//! the next sequence and index. Nothing here touches focus; the caller applies
//! the returned index to its focus registry.
//!
//! # Invariants
//!
//! - The returned sequence always has the input's length.
//! - The returned index is always in `[0, N-1]`.
//! - Rejected input returns the input unchanged with `edited == false`.
//! - An index past the last cell is clamped before the rule applies.

use otc_core::code::{CodeChar, CodeSequence};

pub use crate::paste::handle_paste;

/// Result of a content-changing transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The next sequence.
    pub sequence: CodeSequence,
    /// The next active index.
    pub active: usize,
    /// Whether the event was accepted as an edit (owner must be notified).
    pub edited: bool,
}

impl Transition {
    /// No-op transition: sequence and index unchanged, nothing to report.
    #[must_use]
    pub fn rejected(sequence: &CodeSequence, index: usize) -> Self {
        Self {
            sequence: sequence.clone(),
            active: sequence.clamp_index(index),
            edited: false,
        }
    }
}

/// A cell's control reported `raw` as its new value.
///
/// Accepted only when `raw` is exactly one ASCII letter or digit; it is stored
/// upper-cased and focus advances one cell (staying put on the last cell).
#[must_use]
pub fn handle_character_input(sequence: &CodeSequence, index: usize, raw: &str) -> Transition {
    let index = sequence.clamp_index(index);
    let Some(c) = CodeChar::from_single(raw) else {
        return Transition::rejected(sequence, index);
    };

    let mut next = sequence.clone();
    next.set(index, Some(c));
    Transition {
        active: if index < next.last_index() {
            index + 1
        } else {
            index
        },
        sequence: next,
        edited: true,
    }
}

/// Backspace or Delete on the active cell.
///
/// Clears the cell even when it is already empty and moves focus back one
/// cell (staying on cell 0).
#[must_use]
pub fn handle_delete(sequence: &CodeSequence, index: usize) -> Transition {
    let index = sequence.clamp_index(index);
    let mut next = sequence.clone();
    next.clear(index);
    Transition {
        sequence: next,
        active: index.saturating_sub(1),
        edited: true,
    }
}

/// Move one cell left, clamped at the first cell.
#[must_use]
pub fn handle_arrow_left(sequence: &CodeSequence, index: usize) -> usize {
    sequence.clamp_index(index).saturating_sub(1)
}

/// Move one cell right, clamped at the last cell.
#[must_use]
pub fn handle_arrow_right(sequence: &CodeSequence, index: usize) -> usize {
    sequence.clamp_index(index.saturating_add(1))
}

/// A cell received focus. The active index snaps to it.
#[must_use]
pub fn handle_focus(sequence: &CodeSequence, index: usize) -> usize {
    sequence.clamp_index(index)
}

/// A cell was clicked. The active index snaps to it.
#[must_use]
pub fn handle_click(sequence: &CodeSequence, index: usize) -> usize {
    sequence.clamp_index(index)
}
