#![forbid(unsafe_code)]

//! Replays of browser interaction scripts against the web adapter.
//!
//! Each script is the JSON a page would forward for a real user action,
//! in DOM order (a click delivers `focus` before `click`).

use otc_core::code::CodeSequence;
use otc_web::{DispatchOutcome, HostCommand, WebCodeInput};
use pretty_assertions::assert_eq;

const SEED: &str = "TESTJE";

/// Commands issued when the controller moves focus to `index`.
fn moved_to(index: usize) -> Vec<HostCommand> {
    vec![HostCommand::Focus(index), HostCommand::SelectContent(index)]
}

fn mounted(seed: Option<&str>) -> WebCodeInput {
    let mut web = match seed {
        Some(seed) => WebCodeInput::with_seed(6, seed),
        None => WebCodeInput::new(6),
    }
    .expect("six cells");
    for i in 0..6 {
        web.mount_cell(i);
    }
    web.mount();
    web
}

fn replay(web: &mut WebCodeInput, script: &[&str]) -> Vec<DispatchOutcome> {
    script
        .iter()
        .filter_map(|json| web.dispatch_encoded(json).expect("valid event"))
        .collect()
}

fn click(cell: usize) -> [String; 2] {
    [
        format!(r#"{{"kind":"focus","cell":{cell},"focused":true}}"#),
        format!(r#"{{"kind":"click","cell":{cell},"button":0}}"#),
    ]
}

#[test]
fn typing_a_dash_leaves_cell_empty() {
    let mut web = mounted(None);
    let out = replay(
        &mut web,
        &[
            r#"{"kind":"key","cell":0,"key":"-","code":"Minus"}"#,
            r#"{"kind":"input","cell":0,"data":"-"}"#,
        ],
    );
    // Keydown passes through; the input event is handled and rejected.
    assert!(!out[0].handled);
    assert!(out[1].handled);
    assert!(!out[1].edited);
    assert_eq!(out[1].sequence.cell_str(0), "");
    assert_eq!(web.active(), 0);
}

#[test]
fn seed_fills_every_cell() {
    let web = mounted(Some(SEED));
    assert_eq!(
        web.sequence(),
        &CodeSequence::from_cells(&["T", "E", "S", "T", "J", "E"]).expect("valid")
    );
    assert_eq!(web.active(), 5);
}

#[test]
fn pasting_a_code_fills_all_cells() {
    let mut web = mounted(None);
    let out = replay(&mut web, &[r#"{"kind":"paste","cell":0,"data":"TESTJE"}"#]);
    assert!(out[0].prevent_default);
    assert_eq!(web.code(), SEED);
    assert_eq!(out[0].commands, moved_to(5));
}

#[test]
fn pasting_filters_invalid_characters() {
    let mut web = mounted(None);
    replay(&mut web, &[r#"{"kind":"paste","cell":0,"data":"T*-+[>"}"#]);
    assert_eq!(web.sequence().to_strings(), vec!["T", "", "", "", "", ""]);
    assert_eq!(web.active(), 1);
}

#[test]
fn paste_starts_at_clicked_cell() {
    let mut web = mounted(None);
    let [focus, click] = click(1);
    replay(
        &mut web,
        &[&focus, &click, r#"{"kind":"paste","cell":1,"data":"TESTJE"}"#],
    );
    assert_eq!(
        web.sequence().to_strings(),
        vec!["", "T", "E", "S", "T", "J"]
    );
    assert_eq!(web.active(), 5);
}

#[test]
fn lowercase_input_is_uppercased_and_advances() {
    let mut web = mounted(None);
    let out = replay(&mut web, &[r#"{"kind":"input","cell":0,"data":"a"}"#]);
    assert_eq!(out[0].sequence.cell_str(0), "A");
    assert_eq!(out[0].commands, moved_to(1));
}

#[test]
fn backspace_clears_and_moves_back() {
    let mut web = mounted(Some(SEED));
    let [focus, click] = click(1);
    let out = replay(
        &mut web,
        &[
            &focus,
            &click,
            r#"{"kind":"key","cell":1,"phase":"down","key":"Backspace","code":"Backspace"}"#,
        ],
    );
    let backspace = out.last().expect("outcome");
    assert!(backspace.prevent_default);
    assert_eq!(backspace.commands, moved_to(0));
    assert_eq!(web.sequence().cell_str(0), "T");
    assert_eq!(web.sequence().cell_str(1), "");
}

#[test]
fn arrows_move_focus() {
    let mut web = mounted(Some(SEED));
    let [focus, click] = click(1);
    let out = replay(
        &mut web,
        &[
            &focus,
            &click,
            r#"{"kind":"key","cell":1,"key":"ArrowLeft","code":"ArrowLeft"}"#,
            r#"{"kind":"key","cell":0,"key":"ArrowRight","code":"ArrowRight"}"#,
        ],
    );
    assert_eq!(out[2].commands, moved_to(0));
    assert_eq!(out[3].commands, moved_to(1));
    assert!(out[2].prevent_default && out[3].prevent_default);
    assert!(out.iter().all(|o| !o.edited));
}

#[test]
fn focus_then_click_selects_then_focuses() {
    let mut web = mounted(None);
    let [focus, click] = click(3);
    let out = replay(&mut web, &[&focus, &click]);
    assert_eq!(out[0].commands, vec![HostCommand::SelectContent(3)]);
    assert_eq!(out[1].commands, moved_to(3));
}

#[test]
fn key_release_and_blur_are_ignored() {
    let mut web = mounted(Some(SEED));
    let out = replay(
        &mut web,
        &[
            r#"{"kind":"key","cell":5,"phase":"up","key":"Backspace"}"#,
            r#"{"kind":"focus","cell":5,"focused":false}"#,
        ],
    );
    assert!(out.iter().all(|o| !o.handled && o.commands.is_empty()));
    assert_eq!(web.code(), SEED);
}

#[test]
fn retyping_a_seeded_code_selects_each_next_cell() {
    let mut web = mounted(Some(SEED));
    let [focus, click] = click(0);
    let out = replay(
        &mut web,
        &[
            &focus,
            &click,
            r#"{"kind":"input","cell":0,"data":"x"}"#,
            r#"{"kind":"input","cell":1,"data":"y"}"#,
        ],
    );
    // The page sees the select request without echoing a focus event back.
    assert_eq!(out[2].commands, moved_to(1));
    assert_eq!(out[3].commands, moved_to(2));
    assert_eq!(web.code(), "XYSTJE");
}
