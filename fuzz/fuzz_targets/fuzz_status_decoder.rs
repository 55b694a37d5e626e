#![no_main]

use libfuzzer_sys::fuzz_target;
use wheatstone::client::CommandReply;
use wheatstone::device::{Reconciler, StatusReport};
use wheatstone::formula::{parse_integer, parse_number};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Lenient parsers must never panic on user input
    let _ = parse_number(text);
    let _ = parse_integer(text);
    let _ = CommandReply::from_body(text);

    // Any decodable status document must reconcile cleanly
    if let Ok(report) = StatusReport::from_json(text) {
        let mut reconciler = Reconciler::new();
        reconciler.apply(&report);
        reconciler.apply(&report);
        let _ = reconciler.panel().to_string();
    }
});
