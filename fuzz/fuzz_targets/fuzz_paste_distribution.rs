#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use otc_core::CodeSequence;
use otc_widgets::paste::{handle_paste, normalize_paste};

#[derive(Debug, Arbitrary)]
struct PasteInput {
    len: u8,
    seed: String,
    index: u16,
    clipboard: String,
}

fuzz_target!(|input: PasteInput| {
    let len = usize::from(input.len % 32) + 1;
    let Ok(before) = CodeSequence::seeded(len, &input.seed) else {
        return;
    };
    let index = before.clamp_index(usize::from(input.index));

    let t = handle_paste(&before, index, &input.clipboard);
    let accepted = normalize_paste(&input.clipboard).len();

    assert_eq!(t.sequence.len(), len, "length changed");
    assert!(t.active < len, "active index OOB");
    assert_eq!(t.edited, accepted > 0, "edit flag disagrees with filter");

    for i in 0..index {
        assert_eq!(t.sequence.get(i), before.get(i), "prefix cell {i} changed");
    }
    let end = (index + accepted).min(len);
    for i in end..len {
        assert_eq!(t.sequence.get(i), before.get(i), "suffix cell {i} changed");
    }
    if accepted > 0 {
        assert_eq!(t.active, end.min(len - 1), "next active index");
    } else {
        assert_eq!(t.sequence, before);
    }
});
