// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for log reconstruction
//!
//! Reconstruction only reorders lines and strips leading indentation, so the
//! output is never longer than the input plus one newline per line.

#![no_main]

use libfuzzer_sys::fuzz_target;

use gotest_tree::log::reconstruct;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        let log = reconstruct(raw);
        assert!(log.len() <= raw.len() + raw.lines().count());
    }
});
