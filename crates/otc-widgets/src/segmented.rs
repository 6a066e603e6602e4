#![forbid(unsafe_code)]

//! Segmented code input controller.
//!
//! [`SegmentedCodeInput`] owns the transient part of the widget: the active
//! cell index and the focus registry. The sequence itself belongs to the
//! owner, which passes it in with every event and receives replacements
//! through an `on_change` callback.
//!
//! # Event routing
//!
//! | Event | Cell used | Transition | `on_change` | Default prevented |
//! |-------|-----------|------------|-------------|-------------------|
//! | `Backspace` / `Delete` | active | delete | yes | yes |
//! | `Left` / `Right` | active | arrows | no | yes |
//! | `Char(c)` (no Ctrl/Alt/Super) | active | character input | if accepted | no |
//! | `Input(value)` | target | character input | if accepted | no |
//! | `Paste(text)` | active | paste | if any char accepted | yes |
//! | `Focus(true)` | target | focus + select content | no | no |
//! | `Click` (primary button) | target | click + focus | no | no |
//!
//! Key releases, `Focus(false)`, other keys and clicks with other buttons
//! are not handled.
//!
//! # Invariants
//!
//! 1. After every focus move the controller makes (edit, arrow, click, mount)
//!    the handle at the new active index has been asked for focus and then
//!    for content selection before the call returns. A `Focus(true)` event
//!    only selects, since the host already moved focus.
//! 2. `on_change` receives the full replacement sequence exactly once per
//!    accepted edit and never for navigation.
//! 3. The active index stays within the sequence passed in.

use otc_core::code::CodeSequence;
use otc_core::event::{CellEvent, Event, KeyCode, KeyEvent, MouseButton};

use crate::code_input::{
    Transition, handle_arrow_left, handle_arrow_right, handle_character_input, handle_click,
    handle_delete, handle_focus, handle_paste,
};
use crate::focus::{FocusRegistry, Focusable};

/// Outcome of routing one event through the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventResult {
    /// The controller reacted to the event.
    pub handled: bool,
    /// The host must cancel the event's default action.
    pub prevent_default: bool,
    /// The owner was sent a new sequence.
    pub edited: bool,
    /// Active index after the event.
    pub active: usize,
}

impl EventResult {
    fn ignored(active: usize) -> Self {
        Self {
            active,
            ..Self::default()
        }
    }
}

/// Controller for a segmented one-time-code input.
#[derive(Debug)]
pub struct SegmentedCodeInput<H> {
    active: usize,
    registry: FocusRegistry<H>,
}

impl<H> Default for SegmentedCodeInput<H> {
    fn default() -> Self {
        Self {
            active: 0,
            registry: FocusRegistry::new(),
        }
    }
}

impl<H: Focusable> SegmentedCodeInput<H> {
    /// Create a controller with the first cell active and no handles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently active cell.
    #[inline]
    #[must_use]
    pub fn active(&self) -> usize {
        self.active
    }

    /// The focus handle registry.
    #[must_use]
    pub fn registry(&self) -> &FocusRegistry<H> {
        &self.registry
    }

    /// Register the handle for a freshly mounted cell.
    pub fn mount_cell(&mut self, index: usize, handle: H) -> Option<H> {
        self.registry.register(index, handle)
    }

    /// Drop the handle of an unmounted cell.
    pub fn unmount_cell(&mut self, index: usize) -> Option<H> {
        self.registry.unregister(index)
    }

    /// Pick the initial active cell and focus it.
    ///
    /// Without a seed the first cell is active. A seeded sequence starts at
    /// its first empty cell, or the last cell when it is already complete.
    pub fn mount(&mut self, sequence: &CodeSequence, seeded: bool) -> usize {
        self.active = if seeded {
            sequence
                .first_empty()
                .unwrap_or_else(|| sequence.last_index())
        } else {
            0
        };
        tracing::debug!(active = self.active, seeded, "code input mounted");
        self.focus_active();
        self.active
    }

    /// Route `event` to the matching transition.
    ///
    /// `sequence` is the owner's current value. When the event edits it,
    /// `on_change` is called with the replacement before focus moves.
    pub fn handle_event<F>(
        &mut self,
        event: &CellEvent,
        sequence: &CodeSequence,
        mut on_change: F,
    ) -> EventResult
    where
        F: FnMut(CodeSequence),
    {
        self.active = sequence.clamp_index(self.active);
        let target = event.cell;

        match &event.event {
            Event::Key(key) if key.is_press() => self.handle_key(key, sequence, on_change),
            Event::Key(_) => EventResult::ignored(self.active),
            Event::Input(input) => {
                let transition = handle_character_input(sequence, target, &input.value);
                self.apply("input", transition, false, &mut on_change)
            }
            Event::Paste(paste) => {
                let transition = handle_paste(sequence, self.active, &paste.text);
                self.apply("paste", transition, true, &mut on_change)
            }
            Event::Focus(true) => {
                self.active = handle_focus(sequence, target);
                self.registry.select_content(self.active);
                self.navigated(false)
            }
            Event::Focus(false) => EventResult::ignored(self.active),
            Event::Click(click) if click.button != MouseButton::Left => {
                EventResult::ignored(self.active)
            }
            Event::Click(_) => {
                self.active = handle_click(sequence, target);
                self.focus_active();
                self.navigated(false)
            }
        }
    }

    fn handle_key<F>(
        &mut self,
        key: &KeyEvent,
        sequence: &CodeSequence,
        mut on_change: F,
    ) -> EventResult
    where
        F: FnMut(CodeSequence),
    {
        match key.code {
            KeyCode::Backspace | KeyCode::Delete => {
                let transition = handle_delete(sequence, self.active);
                self.apply("delete", transition, true, &mut on_change)
            }
            KeyCode::Left => {
                self.active = handle_arrow_left(sequence, self.active);
                self.focus_active();
                self.navigated(true)
            }
            KeyCode::Right => {
                self.active = handle_arrow_right(sequence, self.active);
                self.focus_active();
                self.navigated(true)
            }
            KeyCode::Char(c) if !(key.ctrl() || key.alt() || key.super_key()) => {
                let mut buf = [0u8; 4];
                let transition =
                    handle_character_input(sequence, self.active, c.encode_utf8(&mut buf));
                self.apply("input", transition, false, &mut on_change)
            }
            _ => EventResult::ignored(self.active),
        }
    }

    fn apply<F>(
        &mut self,
        operation: &'static str,
        transition: Transition,
        prevent_default: bool,
        on_change: &mut F,
    ) -> EventResult
    where
        F: FnMut(CodeSequence),
    {
        let Transition {
            sequence,
            active,
            edited,
        } = transition;

        if !edited {
            return EventResult {
                handled: true,
                prevent_default,
                edited: false,
                active: self.active,
            };
        }

        let _span = tracing::debug_span!(
            "code_input.edit",
            operation,
            active,
            filled = sequence.filled()
        )
        .entered();

        on_change(sequence);
        self.active = active;
        self.focus_active();

        EventResult {
            handled: true,
            prevent_default,
            edited: true,
            active,
        }
    }

    /// Focus the active cell and select its content, so the next keystroke
    /// replaces it. Hosts do not have to echo a focus event back.
    fn focus_active(&self) {
        self.registry.focus(self.active);
        self.registry.select_content(self.active);
    }

    fn navigated(&self, prevent_default: bool) -> EventResult {
        EventResult {
            handled: true,
            prevent_default,
            edited: false,
            active: self.active,
        }
    }
}
