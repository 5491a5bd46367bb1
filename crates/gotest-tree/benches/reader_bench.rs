// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use gotest_tree::{CancelToken, Reader};

/// Build a `go test -json` stream with `tops` top-level tests, each holding
/// `subs` subtests that log a few lines
fn synthetic_stream(tops: usize, subs: usize) -> String {
    let mut out = String::new();
    let mut line = |test: &str, action: &str, output: Option<&str>| {
        let mut value = serde_json::json!({
            "Action": action,
            "Package": "example.com/bench",
            "Test": test,
        });
        if let Some(text) = output {
            value["Output"] = text.into();
        }
        out.push_str(&value.to_string());
        out.push('\n');
    };

    for t in 0..tops {
        let top = format!("Test{t}");
        line(&top, "run", None);
        line(&top, "output", Some(&format!("=== RUN   {top}\n")));
        for s in 0..subs {
            let sub = format!("{top}/case_{s}");
            line(&sub, "run", None);
            line(&sub, "output", Some(&format!("=== RUN   {sub}\n")));
            for i in 0..3 {
                line(&sub, "output", Some(&format!("    bench_test.go:{i}: step {i}\n")));
            }
        }
        line(&top, "output", Some(&format!("--- PASS: {top} (0.00s)\n")));
        for s in 0..subs {
            let sub = format!("{top}/case_{s}");
            line(&sub, "output", Some(&format!("    --- PASS: {sub} (0.00s)\n")));
            line(&sub, "pass", None);
        }
        line(&top, "pass", None);
    }
    out
}

fn reader_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_all");

    for (tops, subs) in [(10, 10), (100, 10), (10, 200)] {
        let input = synthetic_stream(tops, subs);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{tops}x{subs}")),
            &input,
            |b, input| {
                b.iter(|| {
                    Reader::new(input.as_bytes())
                        .read_all(&CancelToken::new())
                        .expect("not cancelled")
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, reader_benchmarks);
criterion_main!(benches);
