#![forbid(unsafe_code)]

//! JSON input parser for converting host-encoded DOM events to
//! [`otc_core::event::CellEvent`] values.
//!
//! The page's glue code attaches listeners to every cell's `<input>` and
//! forwards each DOM event as one JSON object:
//!
//! ```text
//! {"kind":"key","cell":0,"phase":"down","key":"ArrowLeft","code":"ArrowLeft","mods":0,"repeat":false}
//! {"kind":"input","cell":2,"data":"a"}
//! {"kind":"paste","cell":1,"data":"123456"}
//! {"kind":"focus","cell":3,"focused":true}
//! {"kind":"click","cell":3,"button":0}
//! ```
//!
//! [`parse_encoded_input_to_event`] returns `Ok(None)` for kinds the code
//! input does not react to (e.g. `wheel`, `composition` before `end`).
//!
//! # Design
//!
//! Key `mods` use the same bit layout as [`Modifiers`]: shift = 1, alt = 2,
//! ctrl = 4, super = 8. Out-of-range values are clamped and unknown bits
//! dropped.

use otc_core::event::{
    CellEvent, ClickEvent, Event, InputEvent, KeyCode, KeyEvent, KeyEventKind, Modifiers,
    MouseButton, PasteEvent,
};
use serde::Deserialize;

/// Errors from parsing encoded input JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
    /// Unknown key phase value.
    UnknownPhase(String),
}

impl core::fmt::Display for InputParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::UnknownPhase(phase) => write!(f, "unknown phase: {phase}"),
        }
    }
}

impl std::error::Error for InputParseError {}

/// Internal deserialization target for the host's JSON schema.
#[derive(Debug, Deserialize)]
struct RawInput {
    kind: String,
    #[serde(default)]
    cell: Option<usize>,
    #[serde(default)]
    phase: Option<String>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    mods: Option<i32>,
    #[serde(default)]
    repeat: Option<bool>,
    #[serde(default)]
    button: Option<i32>,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    focused: Option<bool>,
}

/// Parse one JSON-encoded DOM event into a [`CellEvent`].
///
/// Returns `Ok(None)` for event kinds the code input ignores.
///
/// Returns `Err` for malformed JSON, a missing `cell`, a missing required
/// field or an unknown key phase.
pub fn parse_encoded_input_to_event(json: &str) -> Result<Option<CellEvent>, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    let event = match raw.kind.as_str() {
        "key" => Some(parse_key_event(&raw)?),
        "input" => Some(parse_input_event(&raw)?),
        "paste" => Some(parse_paste_event(&raw)?),
        "focus" => Some(parse_focus_event(&raw)?),
        "click" => Some(parse_click_event(&raw)),
        "composition" => parse_composition_event(&raw),
        // Wheel, touch and unknown kinds have no cell mapping.
        _ => None,
    };

    match event {
        Some(event) => {
            let cell = raw.cell.ok_or(InputParseError::MissingField("cell"))?;
            Ok(Some(CellEvent::new(cell, event)))
        }
        None => Ok(None),
    }
}

fn parse_modifiers(mods: Option<i32>) -> Modifiers {
    let bits = mods.unwrap_or(0).clamp(0, i32::from(u8::MAX)) as u8;
    Modifiers::from_bits_truncate(bits)
}

fn parse_key_code_opt(code: &str) -> Option<KeyCode> {
    match code {
        "Backspace" => Some(KeyCode::Backspace),
        "Delete" | "Del" => Some(KeyCode::Delete),
        "Left" | "ArrowLeft" => Some(KeyCode::Left),
        "Right" | "ArrowRight" => Some(KeyCode::Right),
        "Space" | "Spacebar" => Some(KeyCode::Char(' ')),
        other => {
            // DOM KeyboardEvent.code fallback: KeyA..KeyZ
            if let Some(tail) = other.strip_prefix("Key") {
                let mut chars = tail.chars();
                if let Some(c) = chars.next()
                    && chars.next().is_none()
                {
                    return Some(KeyCode::Char(c.to_ascii_lowercase()));
                }
            }
            // DOM KeyboardEvent.code fallback: Digit0..Digit9 and Numpad0..Numpad9
            if let Some(tail) = other
                .strip_prefix("Digit")
                .or_else(|| other.strip_prefix("Numpad"))
            {
                let mut chars = tail.chars();
                if let Some(c) = chars.next()
                    && chars.next().is_none()
                    && c.is_ascii_digit()
                {
                    return Some(KeyCode::Char(c));
                }
            }
            // Single character
            let mut chars = other.chars();
            if let Some(c) = chars.next()
                && chars.next().is_none()
            {
                return Some(KeyCode::Char(c));
            }
            None
        }
    }
}

fn parse_key_event(raw: &RawInput) -> Result<Event, InputParseError> {
    let phase = raw.phase.as_deref().unwrap_or("down");
    let kind = match phase {
        "down" => KeyEventKind::Press,
        "up" => KeyEventKind::Release,
        other => return Err(InputParseError::UnknownPhase(other.to_string())),
    };

    let key_str = raw.key.as_deref().filter(|s| !s.is_empty());
    let code_str = raw.code.as_deref().filter(|s| !s.is_empty());

    if key_str.is_none() && code_str.is_none() {
        return Err(InputParseError::MissingField("code"));
    }

    let kind = if raw.repeat.unwrap_or(false) && kind == KeyEventKind::Press {
        KeyEventKind::Repeat
    } else {
        kind
    };

    // Prefer the logical `key` (layout-aware, mobile keyboards); fall back to
    // the physical `code` label.
    let parsed_code = key_str
        .and_then(parse_key_code_opt)
        .or_else(|| code_str.and_then(parse_key_code_opt))
        .unwrap_or(KeyCode::Null);

    Ok(Event::Key(KeyEvent {
        code: parsed_code,
        modifiers: parse_modifiers(raw.mods),
        kind,
    }))
}

fn parse_input_event(raw: &RawInput) -> Result<Event, InputParseError> {
    let data = raw
        .data
        .as_deref()
        .ok_or(InputParseError::MissingField("data"))?;
    Ok(Event::Input(InputEvent::new(data)))
}

fn parse_paste_event(raw: &RawInput) -> Result<Event, InputParseError> {
    let data = raw
        .data
        .as_deref()
        .ok_or(InputParseError::MissingField("data"))?;
    Ok(Event::Paste(PasteEvent::new(data)))
}

fn parse_focus_event(raw: &RawInput) -> Result<Event, InputParseError> {
    let focused = raw
        .focused
        .ok_or(InputParseError::MissingField("focused"))?;
    Ok(Event::Focus(focused))
}

fn parse_mouse_button(button: Option<i32>) -> MouseButton {
    match button {
        Some(1) => MouseButton::Middle,
        Some(2) => MouseButton::Right,
        _ => MouseButton::Left,
    }
}

fn parse_click_event(raw: &RawInput) -> Event {
    Event::Click(ClickEvent::new(parse_mouse_button(raw.button)))
}

fn parse_composition_event(raw: &RawInput) -> Option<Event> {
    // Only "end" commits text; earlier phases are intermediate IME state.
    if raw.phase.as_deref() != Some("end") {
        return None;
    }
    let data = raw.data.as_deref().filter(|d| !d.is_empty())?;
    // A committed composition lands in the cell like a typed value.
    Some(Event::Input(InputEvent::new(data)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> CellEvent {
        parse_encoded_input_to_event(json).unwrap().unwrap()
    }

    #[test]
    fn key_down_arrow_left() {
        let ev = parse(
            r#"{"kind":"key","cell":2,"phase":"down","key":"ArrowLeft","code":"ArrowLeft","mods":0,"repeat":false}"#,
        );
        assert_eq!(ev, CellEvent::key(2, KeyCode::Left));
    }

    #[test]
    fn key_backspace_and_delete() {
        let ev = parse(r#"{"kind":"key","cell":0,"key":"Backspace","code":"Backspace"}"#);
        assert_eq!(ev, CellEvent::key(0, KeyCode::Backspace));
        let ev = parse(r#"{"kind":"key","cell":4,"key":"Delete"}"#);
        assert_eq!(ev, CellEvent::key(4, KeyCode::Delete));
    }

    #[test]
    fn key_up_is_release() {
        let ev = parse(r#"{"kind":"key","cell":1,"phase":"up","code":"ArrowRight"}"#);
        assert_eq!(
            ev,
            CellEvent::new(
                1,
                Event::Key(KeyEvent {
                    code: KeyCode::Right,
                    modifiers: Modifiers::empty(),
                    kind: KeyEventKind::Release,
                })
            )
        );
    }

    #[test]
    fn key_repeat() {
        let ev = parse(r#"{"kind":"key","cell":3,"phase":"down","key":"Backspace","repeat":true}"#);
        assert_eq!(
            ev.event,
            Event::Key(KeyEvent {
                code: KeyCode::Backspace,
                modifiers: Modifiers::empty(),
                kind: KeyEventKind::Repeat,
            })
        );
    }

    #[test]
    fn key_with_ctrl_modifier() {
        let ev = parse(r#"{"kind":"key","cell":0,"key":"v","code":"KeyV","mods":4}"#);
        assert_eq!(
            ev.event,
            Event::Key(KeyEvent {
                code: KeyCode::Char('v'),
                modifiers: Modifiers::CTRL,
                kind: KeyEventKind::Press,
            })
        );
    }

    #[test]
    fn key_falls_back_to_physical_code() {
        let ev = parse(r#"{"kind":"key","cell":0,"key":"Unidentified","code":"Digit7"}"#);
        assert_eq!(ev, CellEvent::key(0, KeyCode::Char('7')));
        let ev = parse(r#"{"kind":"key","cell":0,"code":"Numpad3"}"#);
        assert_eq!(ev, CellEvent::key(0, KeyCode::Char('3')));
    }

    #[test]
    fn key_unknown_label_is_null() {
        let ev = parse(r#"{"kind":"key","cell":0,"key":"AudioVolumeUp"}"#);
        assert_eq!(ev, CellEvent::key(0, KeyCode::Null));
    }

    #[test]
    fn keys_outside_the_code_field_are_null() {
        for key in ["Enter", "Escape", "Tab", "Home", "End", "ArrowUp", "ArrowDown", "F5"] {
            let json = format!(r#"{{"kind":"key","cell":1,"key":"{key}","code":"{key}"}}"#);
            assert_eq!(parse(&json), CellEvent::key(1, KeyCode::Null), "{key}");
        }
    }

    #[test]
    fn key_without_key_or_code_is_error() {
        let err = parse_encoded_input_to_event(r#"{"kind":"key","cell":0,"key":""}"#).unwrap_err();
        assert_eq!(err, InputParseError::MissingField("code"));
    }

    #[test]
    fn key_unknown_phase_is_error() {
        let err =
            parse_encoded_input_to_event(r#"{"kind":"key","cell":0,"phase":"hold","key":"a"}"#)
                .unwrap_err();
        assert_eq!(err, InputParseError::UnknownPhase("hold".to_string()));
    }

    #[test]
    fn modifiers_out_of_range_are_clamped() {
        let ev = parse(r#"{"kind":"key","cell":0,"key":"a","mods":-9}"#);
        assert_eq!(ev, CellEvent::key(0, KeyCode::Char('a')));
        let ev = parse(r#"{"kind":"key","cell":0,"key":"a","mods":4096}"#);
        let Event::Key(key) = ev.event else {
            panic!("expected key event");
        };
        assert_eq!(key.modifiers, Modifiers::all());
    }

    #[test]
    fn input_value() {
        let ev = parse(r#"{"kind":"input","cell":2,"data":"a"}"#);
        assert_eq!(ev, CellEvent::input(2, "a"));
    }

    #[test]
    fn input_empty_value_is_kept() {
        let ev = parse(r#"{"kind":"input","cell":2,"data":""}"#);
        assert_eq!(ev, CellEvent::input(2, ""));
    }

    #[test]
    fn input_missing_data_is_error() {
        let err = parse_encoded_input_to_event(r#"{"kind":"input","cell":2}"#).unwrap_err();
        assert_eq!(err, InputParseError::MissingField("data"));
    }

    #[test]
    fn paste_keeps_raw_text() {
        let ev = parse(r#"{"kind":"paste","cell":1,"data":" 12-34\n56 "}"#);
        assert_eq!(ev, CellEvent::paste(1, " 12-34\n56 "));
    }

    #[test]
    fn paste_missing_data_is_error() {
        let err = parse_encoded_input_to_event(r#"{"kind":"paste","cell":1}"#).unwrap_err();
        assert_eq!(err, InputParseError::MissingField("data"));
    }

    #[test]
    fn focus_gained_and_lost() {
        assert_eq!(
            parse(r#"{"kind":"focus","cell":3,"focused":true}"#),
            CellEvent::focus(3)
        );
        assert_eq!(
            parse(r#"{"kind":"focus","cell":3,"focused":false}"#),
            CellEvent::new(3, Event::Focus(false))
        );
    }

    #[test]
    fn focus_missing_flag_is_error() {
        let err = parse_encoded_input_to_event(r#"{"kind":"focus","cell":3}"#).unwrap_err();
        assert_eq!(err, InputParseError::MissingField("focused"));
    }

    #[test]
    fn click_buttons() {
        assert_eq!(
            parse(r#"{"kind":"click","cell":4,"button":0}"#),
            CellEvent::click(4)
        );
        assert_eq!(
            parse(r#"{"kind":"click","cell":4,"button":2,"mods":1}"#),
            CellEvent::new(4, Event::Click(ClickEvent::new(MouseButton::Right)))
        );
        assert_eq!(
            parse(r#"{"kind":"click","cell":4,"button":1}"#).event,
            Event::Click(ClickEvent::new(MouseButton::Middle))
        );
        // Missing or unknown buttons default to left.
        assert_eq!(parse(r#"{"kind":"click","cell":4}"#), CellEvent::click(4));
        assert_eq!(
            parse(r#"{"kind":"click","cell":4,"button":-1}"#),
            CellEvent::click(4)
        );
    }

    #[test]
    fn composition_end_becomes_input() {
        let ev = parse(r#"{"kind":"composition","cell":0,"phase":"end","data":"k"}"#);
        assert_eq!(ev, CellEvent::input(0, "k"));
    }

    #[test]
    fn composition_intermediate_is_ignored() {
        let ev = parse_encoded_input_to_event(
            r#"{"kind":"composition","cell":0,"phase":"update","data":"k"}"#,
        )
        .unwrap();
        assert_eq!(ev, None);
        let ev =
            parse_encoded_input_to_event(r#"{"kind":"composition","cell":0,"phase":"end","data":""}"#)
                .unwrap();
        assert_eq!(ev, None);
    }

    #[test]
    fn unknown_kind_is_none() {
        let ev = parse_encoded_input_to_event(r#"{"kind":"wheel","dy":3}"#).unwrap();
        assert_eq!(ev, None);
        let ev = parse_encoded_input_to_event(r#"{"kind":"touch","cell":0}"#).unwrap();
        assert_eq!(ev, None);
    }

    #[test]
    fn missing_cell_is_error() {
        let err = parse_encoded_input_to_event(r#"{"kind":"input","data":"a"}"#).unwrap_err();
        assert_eq!(err, InputParseError::MissingField("cell"));
    }

    #[test]
    fn negative_cell_is_json_error() {
        let err = parse_encoded_input_to_event(r#"{"kind":"input","cell":-1,"data":"a"}"#)
            .unwrap_err();
        assert!(matches!(err, InputParseError::Json(_)));
    }

    #[test]
    fn malformed_json_is_error() {
        let err = parse_encoded_input_to_event("{not json").unwrap_err();
        assert!(matches!(err, InputParseError::Json(_)));
        assert!(err.to_string().starts_with("JSON parse error"));
    }

    #[test]
    fn missing_kind_is_error() {
        let err = parse_encoded_input_to_event(r#"{"cell":0}"#).unwrap_err();
        assert!(matches!(err, InputParseError::Json(_)));
    }

    #[test]
    fn error_display() {
        assert_eq!(
            InputParseError::MissingField("cell").to_string(),
            "missing required field: cell"
        );
        assert_eq!(
            InputParseError::UnknownPhase("x".into()).to_string(),
            "unknown phase: x"
        );
    }
}
