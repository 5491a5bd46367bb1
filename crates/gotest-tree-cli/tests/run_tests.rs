// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! End-to-end tests for the run loop against recorded fixtures

use std::path::{Path, PathBuf};

use gotest_tree::CancelToken;
use gotest_tree_cli::config::{Config, OutputFormat};
use gotest_tree_cli::{RunOutcome, open_input, run};
use similar_asserts::assert_eq;

/// Fixtures live with the library crate
fn fixture(name: &str) -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    Path::new(&manifest_dir)
        .join("../gotest-tree/tests/fixtures")
        .join(name)
}

fn run_fixture(config: Config) -> (anyhow::Result<RunOutcome>, String) {
    let input = open_input(&config).expect("fixture opens");
    let mut out = Vec::new();
    let result = run(&config, input, &CancelToken::new(), &mut out);
    (result, String::from_utf8(out).expect("utf-8 output"))
}

#[test]
fn test_tree_output_for_failing_run() {
    let config = Config {
        input: Some(fixture("calc.jsonl")),
        ..Default::default()
    };
    let (result, out) = run_fixture(config);

    assert_eq!(result.expect("run succeeds"), RunOutcome::TestsFailed);
    assert_eq!(
        out,
        "example.com/calc\n\
         \x20   FAIL TestAdd (0.01s)\n\
         \x20       PASS positive (0.00s)\n\
         \x20       FAIL negative (0.00s)\n\
         \x20   SKIP TestSkipped (0.00s)\n\
         4 tests: 1 passed, 2 failed, 1 skipped, 0 unfinished\n"
    );
}

#[test]
fn test_malformed_lines_are_warnings_by_default() {
    let config = Config {
        input: Some(fixture("deep_malformed.jsonl")),
        ..Default::default()
    };
    let (result, out) = run_fixture(config);

    assert_eq!(result.expect("run succeeds"), RunOutcome::Passed);
    assert!(out.contains("2 malformed input line(s) skipped"));
    assert!(out.contains("            PASS inner (0.00s)\n"));
}

#[test]
fn test_strict_rejects_malformed_lines() {
    let config = Config {
        input: Some(fixture("deep_malformed.jsonl")),
        strict: true,
        ..Default::default()
    };
    let (result, out) = run_fixture(config);

    let err = result.expect_err("strict mode fails");
    assert!(err.to_string().starts_with("2 malformed input line(s)"));
    assert!(out.is_empty());
}

#[test]
fn test_json_output() {
    let config = Config {
        input: Some(fixture("calc.jsonl")),
        format: OutputFormat::Json,
        ..Default::default()
    };
    let (result, out) = run_fixture(config);
    assert!(result.is_ok());

    let value: serde_json::Value = serde_json::from_str(&out).expect("valid json");
    assert_eq!(value["summary"]["total"], 4);
    assert_eq!(value["tests"][0]["test"]["name"], "TestAdd");
    assert_eq!(
        value["tests"][0]["children"][1]["log"],
        "=== RUN   TestAdd/negative\ncalc_test.go:21: got -1, want -3\n--- FAIL: TestAdd/negative (0.00s)\n"
    );
}

#[test]
fn test_cancelled_run_is_an_error() {
    let config = Config::default();
    let token = CancelToken::new();
    token.cancel();
    let mut out = Vec::new();

    let result = run(&config, &b""[..], &token, &mut out);
    let err = result.expect_err("cancelled");
    assert_eq!(err.to_string(), "Failed to read test events");
    assert!(out.is_empty());
}

#[test]
fn test_exit_codes() {
    assert_eq!(RunOutcome::Passed.exit_code(), 0);
    assert_eq!(RunOutcome::TestsFailed.exit_code(), 1);
}

#[test]
fn test_nested_failure_or_unfinished_subtest_fails_run() {
    let failed_subtest = r#"{"Action":"run","Package":"pkg","Test":"TestA"}
{"Action":"run","Package":"pkg","Test":"TestA/Sub"}
{"Action":"fail","Package":"pkg","Test":"TestA/Sub","Elapsed":0}
{"Action":"pass","Package":"pkg","Test":"TestA","Elapsed":0}
"#;
    let unfinished_subtest = r#"{"Action":"run","Package":"pkg","Test":"TestA"}
{"Action":"run","Package":"pkg","Test":"TestA/Sub"}
{"Action":"pass","Package":"pkg","Test":"TestA","Elapsed":0}
"#;

    for input in [failed_subtest, unfinished_subtest] {
        let mut out = Vec::new();
        let outcome = run(
            &Config::default(),
            input.as_bytes(),
            &CancelToken::new(),
            &mut out,
        )
        .expect("run succeeds");
        assert_eq!(outcome, RunOutcome::TestsFailed);
        assert_eq!(outcome.exit_code(), 1);
    }
}
