// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Text and JSON rendering of a reconstructed result set

use std::io::{self, Write as _};

use gotest_tree::{NestedTest, TestSet, TestSetSummary, Verdict};
use serde::Serialize;

const INDENT: &str = "    ";

/// JSON document printed by `--format json`
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    summary: TestSetSummary,
    #[serde(flatten)]
    set: &'a TestSet,
}

/// Write the result set as pretty-printed JSON
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_json(set: &TestSet, out: &mut dyn io::Write) -> serde_json::Result<()> {
    let report = JsonReport {
        summary: set.summary(),
        set,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out).map_err(serde_json::Error::io)
}

/// Write the indented text view
///
/// One line per test, grouped under its package. With `logs`, each test's
/// finished log follows its line, indented one level deeper.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_tree(set: &TestSet, logs: bool, out: &mut dyn io::Write) -> io::Result<()> {
    let mut package: Option<&str> = None;

    for top in &set.tests {
        if package != Some(top.test.package.as_str()) {
            package = Some(top.test.package.as_str());
            writeln!(out, "{}", top.test.package)?;
        }
        write_node(out, top, 1, logs)?;
    }

    let summary = set.summary();
    writeln!(
        out,
        "{} tests: {} passed, {} failed, {} skipped, {} unfinished",
        summary.total, summary.passed, summary.failed, summary.skipped, summary.unfinished
    )?;
    if summary.decode_errors > 0 {
        writeln!(out, "{} malformed input line(s) skipped", summary.decode_errors)?;
    }
    Ok(())
}

fn write_node(
    out: &mut dyn io::Write,
    node: &NestedTest,
    depth: usize,
    logs: bool,
) -> io::Result<()> {
    let indent = INDENT.repeat(depth);
    let label = match node.test.verdict {
        Some(Verdict::Pass) => "PASS",
        Some(Verdict::Fail) => "FAIL",
        Some(Verdict::Skip) => "SKIP",
        None => "????",
    };
    write!(out, "{indent}{label} {}", node.test.display_name())?;
    if let Some(elapsed) = node.test.elapsed {
        write!(out, " ({elapsed:.2}s)")?;
    }
    writeln!(out)?;

    if logs {
        for line in node.log.lines() {
            writeln!(out, "{indent}{INDENT}| {line}")?;
        }
    }

    // Depth is bounded by gotest_tree::MAX_NAME_SEGMENTS
    for child in &node.children {
        write_node(out, child, depth + 1, logs)?;
    }
    Ok(())
}
