// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gotest-tree command library
//!
//! This module exports the command's configuration and run loop for use in
//! integration tests and by the binary.

pub mod config;
pub mod render;

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use anyhow::{Context, Result, bail};
use gotest_tree::{CancelToken, Reader, TestSet};
use tracing::{debug, info, warn};

use crate::config::{Config, OutputFormat};

/// How a completed run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every test finished without failing
    Passed,
    /// At least one test failed or never finished
    TestsFailed,
}

impl RunOutcome {
    /// Process exit code for this outcome
    #[must_use]
    pub fn exit_code(self) -> u8 {
        match self {
            RunOutcome::Passed => 0,
            RunOutcome::TestsFailed => 1,
        }
    }
}

/// Open the configured input, falling back to stdin
///
/// # Errors
///
/// Returns an error if the input file cannot be opened.
pub fn open_input(config: &Config) -> Result<Box<dyn BufRead>> {
    match config.input_path() {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input {}", path.display()))?;
            debug!(path = %path.display(), "reading events from file");
            Ok(Box::new(BufReader::new(file)))
        }
        None => {
            debug!("reading events from stdin");
            Ok(Box::new(io::stdin().lock()))
        }
    }
}

/// Read `input` to completion and print the reconstructed tree to `out`
///
/// # Errors
///
/// Returns an error if the read is cancelled, if writing fails, or, with
/// `--strict`, if the input contained malformed lines.
pub fn run(
    config: &Config,
    input: impl BufRead,
    cancel: &CancelToken,
    out: &mut dyn io::Write,
) -> Result<RunOutcome> {
    let set = Reader::new(input)
        .read_all(cancel)
        .context("Failed to read test events")?;

    report_decode_errors(&set, config.strict)?;

    match config.format {
        OutputFormat::Tree => {
            render::write_tree(&set, config.logs, out).context("Failed to write tree")?;
        }
        OutputFormat::Json => render::write_json(&set, out).context("Failed to write JSON")?,
    }

    let summary = set.summary();
    info!(
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        skipped = summary.skipped,
        "tree reconstructed"
    );

    Ok(if summary.all_passed() {
        RunOutcome::Passed
    } else {
        RunOutcome::TestsFailed
    })
}

fn report_decode_errors(set: &TestSet, strict: bool) -> Result<()> {
    let Some(errors) = &set.errors else {
        return Ok(());
    };

    if strict {
        bail!("{} malformed input line(s):\n{errors}", errors.len());
    }
    for err in errors {
        warn!("{err}");
    }
    Ok(())
}
