#![no_main]

//! Configuration fuzzer.
//!
//! Any text either fails to load with an error or yields a configuration
//! that passes validation and can run a short match without panicking.

use libfuzzer_sys::fuzz_target;
use linewar::headless::{MatchOptions, run_match};
use linewar::SimConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = SimConfig::from_json(text) else {
        return;
    };
    assert!(config.validate().is_ok());

    let options = MatchOptions {
        seed: data.len() as u64,
        max_ticks: 120,
        ..MatchOptions::default()
    };
    // Layout may still reject an arena too small for the nodes
    let _ = run_match(&config, &options);
});
