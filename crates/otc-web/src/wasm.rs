#![forbid(unsafe_code)]

//! `wasm-bindgen` surface for the code input.
//!
//! The page creates one `OtcInputWeb`, registers each cell's `<input>` as it
//! mounts, and forwards DOM events encoded as JSON:
//!
//! ```text
//! const otc = new OtcInputWeb(6, new URLSearchParams(location.search).get("otc"));
//! cells.forEach((el, i) => otc.registerCell(i, el));
//! otc.mount();
//! el.addEventListener("keydown", (e) => {
//!   if (otc.handleEvent(JSON.stringify({ kind: "key", cell: i, key: e.key, code: e.code }))) {
//!     e.preventDefault();
//!   }
//! });
//! ```
//!
//! Focus and select requests from the adapter are applied to the registered
//! elements right away, after the event has been routed. Cell values are
//! rewritten after every handled event, so rejected input never stays
//! visible.

use std::cell::RefCell;

use js_sys::Array;
use tracing::{trace, warn};
use wasm_bindgen::prelude::*;
use web_sys::HtmlInputElement;

use crate::{DispatchOutcome, HostCommand, WebCodeInput};

/// Browser binding of a segmented one-time-code input.
///
/// Every method takes `&self`. `element.focus()` fires the page's `focus`
/// listener synchronously, which calls back into `handleEvent`; state is
/// only borrowed while an event is routed and never while DOM commands run.
#[wasm_bindgen]
pub struct OtcInputWeb {
    inner: RefCell<WebCodeInput>,
    elements: RefCell<Vec<Option<HtmlInputElement>>>,
}

#[wasm_bindgen]
impl OtcInputWeb {
    /// Create an input with `length` cells, optionally prefilled from `seed`.
    #[wasm_bindgen(constructor)]
    pub fn new(length: usize, seed: Option<String>) -> Result<OtcInputWeb, JsValue> {
        let inner = match seed.as_deref() {
            Some(seed) => WebCodeInput::with_seed(length, seed),
            None => WebCodeInput::new(length),
        }
        .map_err(|err| JsValue::from_str(&err.to_string()))?;

        Ok(Self {
            inner: RefCell::new(inner),
            elements: RefCell::new(std::iter::repeat_with(|| None).take(length).collect()),
        })
    }

    /// Bind the `<input>` element of cell `index`.
    ///
    /// The element is limited to one character and shows the cell's value.
    #[wasm_bindgen(js_name = registerCell)]
    pub fn register_cell(&self, index: usize, element: HtmlInputElement) -> bool {
        let value = {
            let mut inner = self.inner.borrow_mut();
            if !inner.mount_cell(index) {
                return false;
            }
            inner.sequence().cell_str(index).to_owned()
        };
        element.set_max_length(1);
        element.set_value(&value);
        if let Some(slot) = self.elements.borrow_mut().get_mut(index) {
            *slot = Some(element);
        }
        true
    }

    /// Release the element of cell `index`.
    #[wasm_bindgen(js_name = unregisterCell)]
    pub fn unregister_cell(&self, index: usize) -> bool {
        if let Some(slot) = self.elements.borrow_mut().get_mut(index) {
            slot.take();
        }
        self.inner.borrow_mut().unmount_cell(index)
    }

    /// Focus the initial cell.
    pub fn mount(&self) -> usize {
        let outcome = self.inner.borrow_mut().mount();
        self.apply(&outcome);
        outcome.active
    }

    /// Route one JSON-encoded DOM event.
    ///
    /// Returns `true` when the caller must call `preventDefault()`.
    #[wasm_bindgen(js_name = handleEvent)]
    pub fn handle_event(&self, json: &str) -> Result<bool, JsValue> {
        let outcome = self
            .inner
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("code input is busy routing another event"))?
            .dispatch_encoded(json)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(match outcome {
            Some(outcome) => {
                self.apply(&outcome);
                outcome.prevent_default
            }
            None => false,
        })
    }

    /// Current cell values, `""` for empty cells.
    pub fn sequence(&self) -> Array {
        let arr = Array::new();
        for cell in self.inner.borrow().sequence().to_strings() {
            arr.push(&JsValue::from_str(&cell));
        }
        arr
    }

    /// Joined code of the filled cells.
    pub fn code(&self) -> String {
        self.inner.borrow().code()
    }

    /// Whether every cell holds a character.
    #[wasm_bindgen(js_name = isComplete)]
    pub fn is_complete(&self) -> bool {
        self.inner.borrow().sequence().is_complete()
    }

    /// Index of the active cell.
    #[wasm_bindgen(js_name = activeIndex)]
    pub fn active_index(&self) -> usize {
        self.inner.borrow().active()
    }
}

impl OtcInputWeb {
    fn apply(&self, outcome: &DispatchOutcome) {
        // Focus listeners may register or unregister cells; work on a snapshot.
        let elements = self.elements.borrow().clone();

        if outcome.handled {
            for (index, element) in elements.iter().enumerate() {
                if let Some(element) = element {
                    element.set_value(outcome.sequence.cell_str(index));
                }
            }
        }

        for command in &outcome.commands {
            match *command {
                HostCommand::Focus(index) => {
                    if let Some(Some(element)) = elements.get(index)
                        && let Err(err) = element.focus()
                    {
                        warn!(index, ?err, "focus request failed");
                    }
                }
                HostCommand::SelectContent(index) => {
                    if let Some(Some(element)) = elements.get(index) {
                        element.select();
                    }
                }
            }
        }
        trace!(
            commands = outcome.commands.len(),
            active = outcome.active,
            "applied dispatch outcome"
        );
    }
}
