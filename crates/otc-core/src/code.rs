#![forbid(unsafe_code)]

//! One-time-code alphabet and the fixed-length cell sequence.
//!
//! # Invariants
//!
//! 1. A [`CodeChar`] is always one of `A-Z` or `0-9`.
//! 2. A [`CodeSequence`] has at least one cell and never changes length.
//! 3. Every cell is either empty or holds exactly one [`CodeChar`].
//!
//! Lowercase ASCII letters are accepted everywhere input enters the model and
//! are upper-cased on the way in. Nothing else is.

use std::fmt;

/// Cell count used when the owner does not configure one.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// A single normalized code character (`A-Z` or `0-9`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CodeChar(u8);

impl CodeChar {
    /// Normalize `c` into the code alphabet.
    ///
    /// ASCII letters are upper-cased; ASCII digits are kept; everything else
    /// (punctuation, whitespace, non-ASCII letters) yields `None`.
    #[must_use]
    pub const fn new(c: char) -> Option<Self> {
        if c.is_ascii_alphanumeric() {
            Some(Self(c.to_ascii_uppercase() as u8))
        } else {
            None
        }
    }

    /// Parse a control value that must be exactly one alphanumeric character.
    #[must_use]
    pub fn from_single(value: &str) -> Option<Self> {
        let mut chars = value.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::new(c)
    }

    /// The character.
    #[must_use]
    pub const fn as_char(self) -> char {
        self.0 as char
    }

    /// The character as a one-byte string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Always a single ASCII byte, so this never fails.
        std::str::from_utf8(std::slice::from_ref(&self.0)).unwrap_or_default()
    }
}

impl fmt::Display for CodeChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Keep only alphabet characters from `text`, normalized, in original order.
pub fn filter_code_chars(text: &str) -> impl Iterator<Item = CodeChar> + '_ {
    text.chars().filter_map(CodeChar::new)
}

/// Errors from constructing a [`CodeSequence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    /// A sequence must have at least one cell.
    ZeroLength,
    /// A supplied cell was neither empty nor a single alphanumeric character.
    InvalidCell {
        /// Position of the offending cell.
        index: usize,
        /// The rejected value.
        value: String,
    },
}

impl fmt::Display for CodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroLength => write!(f, "code sequence must have at least one cell"),
            Self::InvalidCell { index, value } => {
                write!(f, "invalid code cell {index}: {value:?}")
            }
        }
    }
}

impl std::error::Error for CodeError {}

/// Ordered, fixed-length sequence of code cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeSequence {
    cells: Box<[Option<CodeChar>]>,
}

impl CodeSequence {
    /// Create `len` empty cells.
    pub fn new(len: usize) -> Result<Self, CodeError> {
        if len == 0 {
            return Err(CodeError::ZeroLength);
        }
        Ok(Self {
            cells: vec![None; len].into_boxed_slice(),
        })
    }

    /// Build a sequence from cell strings (`""` for empty cells).
    ///
    /// Lowercase letters are upper-cased. Any other content is an error.
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Result<Self, CodeError> {
        if cells.is_empty() {
            return Err(CodeError::ZeroLength);
        }
        let cells = cells
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                let value = cell.as_ref();
                if value.is_empty() {
                    return Ok(None);
                }
                CodeChar::from_single(value)
                    .map(Some)
                    .ok_or_else(|| CodeError::InvalidCell {
                        index,
                        value: value.to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            cells: cells.into_boxed_slice(),
        })
    }

    /// Create `len` cells pre-filled from `text`.
    ///
    /// Characters outside the alphabet are dropped, survivors fill from cell 0
    /// and anything past the last cell is discarded.
    pub fn seeded(len: usize, text: &str) -> Result<Self, CodeError> {
        let mut sequence = Self::new(len)?;
        for (cell, c) in sequence.cells.iter_mut().zip(filter_code_chars(text)) {
            *cell = Some(c);
        }
        Ok(sequence)
    }

    /// Number of cells (N).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false; kept for API symmetry with slices.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Index of the last cell.
    #[inline]
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.cells.len() - 1
    }

    /// Clamp `index` into `[0, N-1]`.
    #[inline]
    #[must_use]
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.last_index())
    }

    /// Content of cell `index`, `None` when empty or out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<CodeChar> {
        self.cells.get(index).copied().flatten()
    }

    /// Content of cell `index` as a string, `""` when empty or out of range.
    #[must_use]
    pub fn cell_str(&self, index: usize) -> &str {
        match self.cells.get(index) {
            Some(Some(c)) => c.as_str(),
            _ => "",
        }
    }

    /// Overwrite cell `index`. Returns false when `index` is out of range.
    pub fn set(&mut self, index: usize, value: Option<CodeChar>) -> bool {
        match self.cells.get_mut(index) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Empty cell `index`. Returns false when `index` is out of range.
    pub fn clear(&mut self, index: usize) -> bool {
        self.set(index, None)
    }

    /// Iterate over the cells in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Option<CodeChar>> + '_ {
        self.cells.iter().copied()
    }

    /// Cells as owned strings, `""` for empty cells.
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        (0..self.len())
            .map(|index| self.cell_str(index).to_owned())
            .collect()
    }

    /// Concatenation of the filled cells.
    #[must_use]
    pub fn code(&self) -> String {
        self.cells.iter().flatten().map(|c| c.as_char()).collect()
    }

    /// Number of filled cells.
    #[must_use]
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// True when every cell holds a character.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Index of the first empty cell, if any.
    #[must_use]
    pub fn first_empty(&self) -> Option<usize> {
        self.cells.iter().position(Option::is_none)
    }
}

impl Default for CodeSequence {
    fn default() -> Self {
        Self {
            cells: vec![None; DEFAULT_CODE_LENGTH].into_boxed_slice(),
        }
    }
}

impl fmt::Display for CodeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in self.iter() {
            match cell {
                Some(c) => write!(f, "{c}")?,
                None => write!(f, "_")?,
            }
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CodeSequence {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;

        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for index in 0..self.len() {
            seq.serialize_element(self.cell_str(index))?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CodeSequence {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cells = Vec::<String>::deserialize(deserializer)?;
        Self::from_cells(&cells).map_err(serde::de::Error::custom)
    }
}
