// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the stream reader
//!
//! Arbitrary bytes, including invalid UTF-8 and half-written JSON lines, must
//! never panic and must never make an uncancelled read fail.

#![no_main]

use libfuzzer_sys::fuzz_target;

use gotest_tree::{CancelToken, Reader};

fuzz_target!(|data: &[u8]| {
    let set = Reader::new(data)
        .read_all(&CancelToken::new())
        .expect("uncancelled reads never fail");

    // Walking the result should never panic either
    let _ = set.summary();
});
