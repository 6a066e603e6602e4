#![forbid(unsafe_code)]

//! `otc-web` drives a segmented one-time-code input from a browser page.
//!
//! Design goals:
//! - **Host-driven I/O**: the page forwards DOM events (as [`CellEvent`]s or
//!   their JSON encoding) and applies the commands it gets back.
//! - **No DOM access in the core path**: focus and select requests are queued
//!   as [`HostCommand`]s, so the adapter runs and tests natively.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! On `wasm32` the [`wasm`] module exposes the same adapter to JavaScript and
//! applies the commands to real `<input>` elements.

pub mod input_parser;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

use std::cell::RefCell;
use std::rc::Rc;

use otc_core::code::{CodeError, CodeSequence};
use otc_core::event::{CellEvent, Event, KeyCode};
use otc_widgets::{EventResult, Focusable, SegmentedCodeInput};
use serde::Serialize;

pub use input_parser::{InputParseError, parse_encoded_input_to_event};

/// A request the page must apply to one of its cell elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "command", content = "cell", rename_all = "camelCase")]
pub enum HostCommand {
    /// Call `focus()` on the cell's element.
    Focus(usize),
    /// Call `select()` on the cell's element.
    SelectContent(usize),
}

/// Shared queue of [`HostCommand`]s, filled by cell handles during dispatch.
#[derive(Debug, Clone, Default)]
pub struct CommandOutbox {
    queue: Rc<RefCell<Vec<HostCommand>>>,
}

impl CommandOutbox {
    /// Create an empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, command: HostCommand) {
        self.queue.borrow_mut().push(command);
    }

    /// Take every queued command, oldest first.
    pub fn drain(&self) -> Vec<HostCommand> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }

    /// Number of queued commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    /// True when nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Focus handle for a mounted cell element. Requests land in the outbox.
#[derive(Debug, Clone)]
pub struct HostCellHandle {
    index: usize,
    outbox: CommandOutbox,
}

impl HostCellHandle {
    /// Handle for cell `index` writing into `outbox`.
    #[must_use]
    pub fn new(index: usize, outbox: CommandOutbox) -> Self {
        Self { index, outbox }
    }

    /// Cell this handle stands for.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Focusable for HostCellHandle {
    fn focus(&self) {
        self.outbox.push(HostCommand::Focus(self.index));
    }

    fn select_content(&self) {
        self.outbox.push(HostCommand::SelectContent(self.index));
    }
}

/// What the page must do after one dispatched event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    /// The adapter reacted to the event.
    pub handled: bool,
    /// Call `preventDefault()` on the DOM event.
    pub prevent_default: bool,
    /// The sequence changed; cell values must be re-rendered.
    pub edited: bool,
    /// Active cell after the event.
    pub active: usize,
    /// Current sequence, one string per cell.
    pub sequence: CodeSequence,
    /// Focus/select requests in the order they were issued.
    pub commands: Vec<HostCommand>,
}

/// Browser-side owner of a segmented code input.
///
/// Holds the page's copy of the [`CodeSequence`] and replaces it from the
/// controller's `on_change` callback.
#[derive(Debug)]
pub struct WebCodeInput {
    sequence: CodeSequence,
    seeded: bool,
    input: SegmentedCodeInput<HostCellHandle>,
    outbox: CommandOutbox,
}

impl WebCodeInput {
    /// Empty input with `len` cells.
    pub fn new(len: usize) -> Result<Self, CodeError> {
        Ok(Self::from_sequence(CodeSequence::new(len)?, false))
    }

    /// Input with `len` cells prefilled from `seed` (e.g. a link's query
    /// parameter). Characters outside `[A-Za-z0-9]` are dropped.
    pub fn with_seed(len: usize, seed: &str) -> Result<Self, CodeError> {
        Ok(Self::from_sequence(CodeSequence::seeded(len, seed)?, true))
    }

    /// Wrap an existing sequence. `seeded` selects the initial focus rule.
    #[must_use]
    pub fn from_sequence(sequence: CodeSequence, seeded: bool) -> Self {
        Self {
            sequence,
            seeded,
            input: SegmentedCodeInput::new(),
            outbox: CommandOutbox::new(),
        }
    }

    /// Current sequence.
    #[must_use]
    pub fn sequence(&self) -> &CodeSequence {
        &self.sequence
    }

    /// Joined code of the filled cells.
    #[must_use]
    pub fn code(&self) -> String {
        self.sequence.code()
    }

    /// Active cell.
    #[must_use]
    pub fn active(&self) -> usize {
        self.input.active()
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Always false: a sequence has at least one cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Register the element of a mounted cell.
    ///
    /// Returns false when `index` is outside the sequence.
    pub fn mount_cell(&mut self, index: usize) -> bool {
        if index >= self.sequence.len() {
            tracing::debug!(index, len = self.sequence.len(), "cell index out of range");
            return false;
        }
        self.input
            .mount_cell(index, HostCellHandle::new(index, self.outbox.clone()));
        true
    }

    /// Forget the element of an unmounted cell.
    pub fn unmount_cell(&mut self, index: usize) -> bool {
        self.input.unmount_cell(index).is_some()
    }

    /// Choose the initial active cell and request focus for it.
    pub fn mount(&mut self) -> DispatchOutcome {
        let active = self.input.mount(&self.sequence, self.seeded);
        self.outcome(EventResult {
            handled: true,
            active,
            ..EventResult::default()
        })
    }

    /// Replace the sequence from outside (e.g. the owner resets the form).
    pub fn set_sequence(&mut self, sequence: CodeSequence) {
        self.sequence = sequence;
    }

    /// Route one cell event.
    ///
    /// Printable keydowns are left to the browser: the `input` event that
    /// follows carries the authoritative value.
    pub fn dispatch(&mut self, event: &CellEvent) -> DispatchOutcome {
        if is_printable_keydown(&event.event) {
            return self.outcome(EventResult {
                active: self.input.active(),
                ..EventResult::default()
            });
        }

        let Self {
            sequence, input, ..
        } = self;
        let mut replacement = None;
        let result = input.handle_event(event, sequence, |next| replacement = Some(next));
        if let Some(next) = replacement {
            *sequence = next;
        }

        tracing::debug!(
            cell = event.cell,
            handled = result.handled,
            edited = result.edited,
            active = result.active,
            "dispatched cell event"
        );
        self.outcome(result)
    }

    /// Parse a JSON-encoded DOM event and route it.
    ///
    /// Returns `Ok(None)` for event kinds the input ignores.
    pub fn dispatch_encoded(
        &mut self,
        json: &str,
    ) -> Result<Option<DispatchOutcome>, InputParseError> {
        let event = parse_encoded_input_to_event(json).inspect_err(|err| {
            tracing::debug!(error = %err, "rejected encoded input");
        })?;
        Ok(event.map(|event| self.dispatch(&event)))
    }

    fn outcome(&self, result: EventResult) -> DispatchOutcome {
        DispatchOutcome {
            handled: result.handled,
            prevent_default: result.prevent_default,
            edited: result.edited,
            active: result.active,
            sequence: self.sequence.clone(),
            commands: self.outbox.drain(),
        }
    }
}

fn is_printable_keydown(event: &Event) -> bool {
    match event {
        Event::Key(key) => {
            matches!(key.code, KeyCode::Char(_)) && !(key.ctrl() || key.alt() || key.super_key())
        }
        _ => false,
    }
}
