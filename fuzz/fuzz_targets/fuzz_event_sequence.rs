#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use otc_core::CodeSequence;
use otc_core::event::{CellEvent, KeyCode};
use otc_widgets::{Focusable, SegmentedCodeInput};

struct NoFocus;

impl Focusable for NoFocus {
    fn focus(&self) {}
    fn select_content(&self) {}
}

#[derive(Debug, Arbitrary)]
enum Op {
    Input(u8, String),
    Paste(u8, String),
    Backspace(u8),
    Delete(u8),
    Left(u8),
    Right(u8),
    Focus(u8),
    Click(u8),
}

#[derive(Debug, Arbitrary)]
struct Script {
    len: u8,
    seed: Option<String>,
    ops: Vec<Op>,
}

fuzz_target!(|script: Script| {
    let len = usize::from(script.len % 16) + 1;
    let seeded = script.seed.is_some();
    let Ok(mut sequence) = CodeSequence::seeded(len, script.seed.as_deref().unwrap_or("")) else {
        return;
    };

    let mut input = SegmentedCodeInput::new();
    for index in 0..len {
        input.mount_cell(index, NoFocus);
    }
    input.mount(&sequence, seeded);

    for op in script.ops.into_iter().take(256) {
        let event = match op {
            Op::Input(i, s) => CellEvent::input(usize::from(i), s),
            Op::Paste(i, s) => CellEvent::paste(usize::from(i), s),
            Op::Backspace(i) => CellEvent::key(usize::from(i), KeyCode::Backspace),
            Op::Delete(i) => CellEvent::key(usize::from(i), KeyCode::Delete),
            Op::Left(i) => CellEvent::key(usize::from(i), KeyCode::Left),
            Op::Right(i) => CellEvent::key(usize::from(i), KeyCode::Right),
            Op::Focus(i) => CellEvent::focus(usize::from(i)),
            Op::Click(i) => CellEvent::click(usize::from(i)),
        };

        let mut notified = 0usize;
        let mut replacement = None;
        let result = input.handle_event(&event, &sequence, |next| {
            notified += 1;
            replacement = Some(next);
        });
        if let Some(next) = replacement {
            sequence = next;
        }

        assert_eq!(sequence.len(), len, "length changed");
        assert!(result.active < len, "active index OOB");
        assert_eq!(result.active, input.active());
        assert_eq!(notified, usize::from(result.edited), "notify count");
    }
});
