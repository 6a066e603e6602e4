#![no_main]

use libfuzzer_sys::fuzz_target;
use otc_web::{WebCodeInput, parse_encoded_input_to_event};

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };

    let _ = parse_encoded_input_to_event(json);

    let Ok(mut input) = WebCodeInput::new(6) else {
        return;
    };
    for index in 0..input.len() {
        input.mount_cell(index);
    }
    input.mount();
    if let Ok(Some(outcome)) = input.dispatch_encoded(json) {
        assert_eq!(outcome.sequence.len(), 6, "length changed");
        assert!(outcome.active < 6, "active index OOB");
        assert!(!outcome.edited || outcome.handled, "edit without handling");
    }
});
