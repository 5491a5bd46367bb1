// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Stream driver: ingest a whole `go test -json` stream, then rebuild the tree
//!
//! # Example
//!
//! ```
//! use gotest_tree::{CancelToken, Reader};
//!
//! let input = concat!(
//!     r#"{"Action":"run","Package":"pkg","Test":"TestA"}"#, "\n",
//!     r#"{"Action":"output","Package":"pkg","Test":"TestA","Output":"--- PASS: TestA (0.00s)\n"}"#, "\n",
//!     r#"{"Action":"pass","Package":"pkg","Test":"TestA","Elapsed":0}"#, "\n",
//! );
//!
//! let set = Reader::new(input.as_bytes())
//!     .read_all(&CancelToken::new())
//!     .expect("not cancelled");
//! assert!(set.errors.is_none());
//! assert_eq!(set.tests[0].log, "--- PASS: TestA (0.00s)\n");
//! ```

use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{DecodeErrors, LineError, LineErrorKind, ReadError};
use crate::event::{Event, Verdict};
use crate::log::{NestedTest, walk_top_level};
use crate::trie::HierarchyTrie;

/// Cooperative cancellation signal, checked once per input line
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that is not cancelled
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether the signal was raised
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of one run
#[derive(Debug, Default, Serialize)]
pub struct TestSet {
    /// Lines that could not be decoded, joined; `None` when every line decoded
    pub errors: Option<DecodeErrors>,
    /// Top-level tests in first-seen order
    pub tests: Vec<NestedTest>,
}

/// Verdict counts over every node of a [`TestSet`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TestSetSummary {
    /// Tests and subtests
    pub total: usize,
    /// Passed
    pub passed: usize,
    /// Failed
    pub failed: usize,
    /// Skipped
    pub skipped: usize,
    /// No verdict was ever reported (e.g. the binary panicked)
    pub unfinished: usize,
    /// Non-fatal line errors
    pub decode_errors: usize,
}

impl TestSetSummary {
    /// Whether nothing failed and every test finished
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.unfinished == 0
    }
}

impl TestSet {
    /// Every node of every tree, depth first
    pub fn iter(&self) -> impl Iterator<Item = &NestedTest> {
        self.tests.iter().flat_map(NestedTest::iter)
    }

    /// Count verdicts across the whole forest
    #[must_use]
    pub fn summary(&self) -> TestSetSummary {
        let mut summary = TestSetSummary {
            decode_errors: self.errors.as_ref().map_or(0, DecodeErrors::len),
            ..TestSetSummary::default()
        };
        for node in self.iter() {
            summary.total += 1;
            match node.test.verdict {
                Some(Verdict::Pass) => summary.passed += 1,
                Some(Verdict::Fail) => summary.failed += 1,
                Some(Verdict::Skip) => summary.skipped += 1,
                None => summary.unfinished += 1,
            }
        }
        summary
    }

    /// Tests and subtests that reported a failure
    pub fn failing_tests(&self) -> impl Iterator<Item = &NestedTest> {
        self.iter().filter(|node| node.test.failed())
    }
}

/// Consumes one event stream; not reusable across runs
pub struct Reader<R> {
    inner: R,
}

impl<R: BufRead> Reader<R> {
    /// Wrap a buffered byte source
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Drain the stream, then reconstruct every top-level test
    ///
    /// Malformed lines are collected into [`TestSet::errors`] and skipped. A
    /// read failure ends ingestion and is recorded the same way; whatever was
    /// read up to that point is still reconstructed.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::Cancelled`] if `cancel` is raised before the
    /// stream is exhausted. No partial result is returned in that case.
    pub fn read_all(mut self, cancel: &CancelToken) -> Result<TestSet, ReadError> {
        let mut trie = HierarchyTrie::new();
        let mut errors = DecodeErrors::default();
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            if cancel.is_cancelled() {
                debug!(lines_read = line_no, "read cancelled");
                return Err(ReadError::Cancelled {
                    lines_read: line_no,
                });
            }

            buf.clear();
            let read = self.inner.read_until(b'\n', &mut buf);
            line_no += 1;
            match read {
                Ok(0) => break,
                Ok(_) => {}
                Err(err) => {
                    warn!(line = line_no, error = %err, "input read failed, stopping ingestion");
                    errors.push(LineError {
                        line: line_no,
                        kind: LineErrorKind::Io(err),
                    });
                    break;
                }
            }

            let line = buf.trim_ascii();
            if line.is_empty() {
                continue;
            }

            match Event::from_slice(line) {
                Ok(event) => {
                    if let Err(err) = trie.fold(&event) {
                        debug!(line = line_no, error = %err, "skipping over-deep test name");
                        errors.push(LineError {
                            line: line_no,
                            kind: LineErrorKind::NameTooDeep(err),
                        });
                    }
                }
                Err(err) => {
                    debug!(line = line_no, error = %err, "skipping malformed line");
                    errors.push(LineError {
                        line: line_no,
                        kind: LineErrorKind::Json(err),
                    });
                }
            }
        }

        let top_level: Vec<_> = trie.top_level().collect();
        let mut tests = Vec::with_capacity(top_level.len());
        for id in top_level {
            if let Some(nested) = walk_top_level(&mut trie, id) {
                tests.push(nested);
            }
        }

        let set = TestSet {
            errors: errors.into_option(),
            tests,
        };
        debug!(
            top_level = set.tests.len(),
            known_tests = trie.test_count(),
            decode_errors = set.errors.as_ref().map_or(0, DecodeErrors::len),
            "event stream reconstructed"
        );
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Read};

    fn read(input: &str) -> TestSet {
        Reader::new(input.as_bytes())
            .read_all(&CancelToken::new())
            .expect("not cancelled")
    }

    /// Yields `data`, then fails
    struct FailingReader {
        data: io::Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::other("disk on fire")),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn test_cancelled_before_first_line() {
        let token = CancelToken::new();
        token.cancel();
        let result = Reader::new(&b"{\"Action\":\"run\",\"Package\":\"p\",\"Test\":\"T\"}\n"[..])
            .read_all(&token);
        assert!(matches!(result, Err(ReadError::Cancelled { lines_read: 0 })));
    }

    #[test]
    fn test_cancelled_token_on_empty_input_still_errors() {
        let token = CancelToken::new();
        token.clone().cancel();
        assert!(token.is_cancelled());
        let result = Reader::new(io::empty()).read_all(&token);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_input() {
        let set = read("");
        assert!(set.errors.is_none());
        assert!(set.tests.is_empty());
        assert_eq!(set.summary(), TestSetSummary::default());
    }

    #[test]
    fn test_blank_lines_are_not_errors() {
        let set = read("\n   \n\r\n");
        assert!(set.errors.is_none());
    }

    #[test]
    fn test_malformed_lines_are_collected() {
        let input = "garbage\n\
            {\"Action\":\"run\",\"Package\":\"p\",\"Test\":\"T\"}\n\
            {\"Action\":\n";
        let set = read(input);
        let errors = set.errors.expect("two malformed lines");
        let lines: Vec<usize> = errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![1, 3]);
        assert_eq!(set.tests.len(), 1);
    }

    #[test]
    fn test_read_failure_keeps_what_was_read() {
        let data = b"{\"Action\":\"pass\",\"Package\":\"p\",\"Test\":\"T\"}\n".to_vec();
        let reader = io::BufReader::new(FailingReader {
            data: io::Cursor::new(data),
        });
        let set = Reader::new(reader)
            .read_all(&CancelToken::new())
            .expect("io errors are not fatal");

        assert_eq!(set.tests.len(), 1);
        let errors = set.errors.expect("io error recorded");
        assert_eq!(errors.len(), 1);
        assert!(errors.iter().all(LineError::is_io));
    }

    #[test]
    fn test_summary_counts_every_node() {
        let input = [
            r#"{"Action":"run","Package":"p","Test":"TestA"}"#,
            r#"{"Action":"run","Package":"p","Test":"TestA/ok"}"#,
            r#"{"Action":"pass","Package":"p","Test":"TestA/ok"}"#,
            r#"{"Action":"run","Package":"p","Test":"TestA/bad"}"#,
            r#"{"Action":"fail","Package":"p","Test":"TestA/bad"}"#,
            r#"{"Action":"fail","Package":"p","Test":"TestA"}"#,
            r#"{"Action":"skip","Package":"p","Test":"TestB"}"#,
            r#"{"Action":"run","Package":"p","Test":"TestC"}"#,
            r#"{"Action":"fail","Package":"p"}"#,
        ]
        .join("\n");

        let set = read(&input);
        let summary = set.summary();
        assert_eq!(
            summary,
            TestSetSummary {
                total: 5,
                passed: 1,
                failed: 2,
                skipped: 1,
                unfinished: 1,
                decode_errors: 0,
            }
        );
        assert!(!summary.all_passed());

        let failing: Vec<&str> = set.failing_tests().map(|n| n.test.name.as_str()).collect();
        assert_eq!(failing, vec!["TestA", "TestA/bad"]);
    }
}
