#![no_main]

use libfuzzer_sys::fuzz_target;

mod common;

use common::{engine, Outer};

// Arbitrary input must never panic; errors are fine.
fuzz_target!(|data: &[u8]| {
    let engine = engine();
    let mut value = Outer::seeded();
    if engine.unmarshal(data, &mut value).is_ok() {
        // Whatever decoded must encode again, unless a value outgrew its width.
        let _ = engine.marshal(&value);
    }
});
