#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! Every event a segmented code widget reacts to originates at one cell, so
//! the widget receives a [`CellEvent`]: the index of the cell the host
//! delivered the event to plus the [`Event`] itself. All events derive
//! `Clone`, `PartialEq`, and `Eq` for use in tests and pattern matching.
//!
//! # Design Notes
//!
//! - `KeyEventKind` defaults to `Press` when the host does not report it
//! - `Modifiers` use bitflags for easy combination
//! - `Input` carries the full new value of the cell's control, not a delta

use bitflags::bitflags;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// The cell's control reports a new value (DOM `input`/`change`).
    Input(InputEvent),

    /// Clipboard paste into a cell.
    Paste(PasteEvent),

    /// Focus gained or lost.
    ///
    /// `true` = focus gained, `false` = focus lost.
    Focus(bool),

    /// The cell was clicked.
    Click(ClickEvent),
}

/// An [`Event`] addressed to one cell of a segmented input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEvent {
    /// Index of the cell the event was delivered to.
    pub cell: usize,

    /// The event payload.
    pub event: Event,
}

impl CellEvent {
    /// Address `event` to `cell`.
    #[must_use]
    pub fn new(cell: usize, event: Event) -> Self {
        Self { cell, event }
    }

    /// Key press on `cell`.
    #[must_use]
    pub fn key(cell: usize, code: KeyCode) -> Self {
        Self::new(cell, Event::Key(KeyEvent::new(code)))
    }

    /// New control value on `cell`.
    #[must_use]
    pub fn input(cell: usize, value: impl Into<String>) -> Self {
        Self::new(cell, Event::Input(InputEvent::new(value)))
    }

    /// Paste on `cell`.
    #[must_use]
    pub fn paste(cell: usize, text: impl Into<String>) -> Self {
        Self::new(cell, Event::Paste(PasteEvent::new(text)))
    }

    /// Focus gained on `cell`.
    #[must_use]
    pub fn focus(cell: usize) -> Self {
        Self::new(cell, Event::Focus(true))
    }

    /// Primary-button click on `cell`.
    #[must_use]
    pub fn click(cell: usize) -> Self {
        Self::new(cell, Event::Click(ClickEvent::new(MouseButton::Left)))
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Check if Alt modifier is held.
    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Check if Super/Meta/Cmd modifier is held.
    #[must_use]
    pub const fn super_key(&self) -> bool {
        self.modifiers.contains(Modifiers::SUPER)
    }

    /// True for press and auto-repeat, false for release.
    #[must_use]
    pub const fn is_press(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }
}

/// Key codes a code cell reacts to.
///
/// Hosts map every other key to [`KeyCode::Null`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),

    /// Backspace key.
    Backspace,

    /// Delete key.
    Delete,

    /// Left arrow key.
    Left,

    /// Right arrow key.
    Right,

    /// Key the host could not name, or one the code input ignores.
    Null,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// New value of a cell's input control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    /// Full control value after the keystroke. May be empty.
    pub value: String,
}

impl InputEvent {
    /// Create a new input event.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// A clipboard paste delivered to a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteEvent {
    /// The raw pasted text (`text/plain`), unfiltered.
    pub text: String,
}

impl PasteEvent {
    /// Create a new paste event.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A click on a cell.
///
/// Only primary-button clicks move focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    /// Button that produced the click.
    pub button: MouseButton,
}

impl ClickEvent {
    /// Create a new click event.
    #[must_use]
    pub const fn new(button: MouseButton) -> Self {
        Self { button }
    }
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    /// Left mouse button.
    #[default]
    Left,

    /// Right mouse button.
    Right,

    /// Middle mouse button (scroll wheel click).
    Middle,
}
