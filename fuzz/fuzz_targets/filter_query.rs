#![no_main]

use depgraph_core::{Edge, Filter};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Some((key, value)) = input.split_once('=') else {
        return;
    };

    let edge = Edge::new("static", "a".to_string(), "b".to_string());
    let filter = Filter::new(key, value);
    let _ = filter.matches(&edge);
    let _ = filter.matches("a");
});
