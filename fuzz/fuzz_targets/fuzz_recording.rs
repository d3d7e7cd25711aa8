#![no_main]

//! Recording loader fuzzer.
//!
//! Arbitrary JSON must either fail to parse, fail validation, or re-play to
//! an error or a valid board. It must never panic.

use clipem::game::check_invariants;
use clipem::replay::{Recording, ReplayEngine};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(recording) = serde_json::from_slice::<Recording>(data) else {
        return;
    };
    if recording.config.validate().is_err() {
        return;
    }
    let Ok(mut engine) = ReplayEngine::new(recording) else {
        return;
    };
    if let Ok(state) = engine.verify_all() {
        let violations = check_invariants(state);
        assert!(violations.is_empty(), "replayed board is corrupt: {violations:?}");
    }
});
