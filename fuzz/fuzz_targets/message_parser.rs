//! Fuzz target for protocol line parsing
//!
//! Feeds arbitrary input to the line parser and ensures it never
//! panics; malformed lines must come back as errors.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::str;

fuzz_target!(|data: &[u8]| {
    // Only fuzz valid UTF-8 strings to focus on protocol-level issues
    if let Ok(input) = str::from_utf8(data) {
        // Lines longer than a read buffer never reach the parser whole
        if input.len() > 2048 {
            return;
        }

        let _ = seabot::Message::parse(input);
    }
});
