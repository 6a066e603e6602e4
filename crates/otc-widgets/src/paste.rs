#![forbid(unsafe_code)]

//! Paste distribution across cells.
//!
//! Pasted text is reduced to the code alphabet and written into consecutive
//! cells starting at the active cell. Cells before the active cell and cells
//! past the pasted run keep their content; pasted characters that do not fit
//! are dropped.
//!
//! # Next active index
//!
//! With `k` accepted characters pasted at `index`:
//! - `index + k >= N`: the last cell.
//! - otherwise: `index + k`, the cell right after the pasted run.
//!
//! This is positional. Earlier empty cells are not searched for.

use otc_core::code::{CodeChar, CodeSequence, filter_code_chars};

use crate::code_input::Transition;

/// Reduce clipboard text to normalized code characters, order preserved.
#[must_use]
pub fn normalize_paste(text: &str) -> Vec<CodeChar> {
    filter_code_chars(text).collect()
}

/// Distribute `clipboard` over the cells starting at `index`.
///
/// Text without a single alphabet character changes nothing and is not an
/// edit.
#[must_use]
pub fn handle_paste(sequence: &CodeSequence, index: usize, clipboard: &str) -> Transition {
    let index = sequence.clamp_index(index);
    let valid = normalize_paste(clipboard);
    if valid.is_empty() {
        return Transition::rejected(sequence, index);
    }

    let mut next = sequence.clone();
    let room = next.len() - index;
    for (offset, c) in valid.iter().take(room).enumerate() {
        next.set(index + offset, Some(*c));
    }

    let end = index + valid.len();
    let active = if end >= next.len() {
        next.last_index()
    } else {
        end
    };

    Transition {
        sequence: next,
        active,
        edited: true,
    }
}
