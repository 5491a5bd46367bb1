// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test events and the per-test records they fold into
//!
//! Events are the lines produced by `go test -json` (or `go tool test2json`).
//! Each line names a package, optionally a test, and an action:
//!
//! ```text
//! {"Time":"2026-01-17T02:33:06Z","Action":"run","Package":"pkg","Test":"TestA"}
//! {"Time":"2026-01-17T02:33:06Z","Action":"output","Package":"pkg","Test":"TestA","Output":"=== RUN   TestA\n"}
//! {"Time":"2026-01-17T02:33:06Z","Action":"pass","Package":"pkg","Test":"TestA","Elapsed":0.01}
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Separator between the segments of a subtest name (`TestA/Sub/Leaf`)
pub const NAME_SEPARATOR: char = '/';

/// Action carried by a single event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// The test binary is about to run
    Start,
    /// A test started running
    Run,
    /// A test was paused
    Pause,
    /// A paused test resumed
    Cont,
    /// A test passed
    Pass,
    /// A benchmark printed log output but did not fail
    Bench,
    /// A test failed
    Fail,
    /// A test printed output
    Output,
    /// A test was skipped or its package had no tests
    Skip,
    /// Any action this crate does not know about
    #[serde(other)]
    Other,
}

impl Action {
    /// Terminal verdict for this action, if it is one
    #[must_use]
    pub fn verdict(self) -> Option<Verdict> {
        match self {
            Action::Pass => Some(Verdict::Pass),
            Action::Fail => Some(Verdict::Fail),
            Action::Skip => Some(Verdict::Skip),
            _ => None,
        }
    }
}

/// Terminal status of a test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Test passed
    Pass,
    /// Test failed
    Fail,
    /// Test was skipped
    Skip,
}

impl Verdict {
    /// All verdicts, in banner-matching order
    pub const ALL: [Verdict; 3] = [Verdict::Fail, Verdict::Pass, Verdict::Skip];

    /// Upper-cased token printed in `--- PASS: TestA (0.00s)` banners
    #[must_use]
    pub fn banner(self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
            Verdict::Skip => "SKIP",
        }
    }
}

/// One decoded input line
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Event {
    /// When the event was emitted
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    /// What happened
    pub action: Action,
    /// Import path of the package under test
    #[serde(default)]
    pub package: String,
    /// Test name; absent for package-level events
    #[serde(default)]
    pub test: Option<String>,
    /// Elapsed seconds, set on terminal actions
    #[serde(default)]
    pub elapsed: Option<f64>,
    /// Output fragment, set on `output` actions
    #[serde(default)]
    pub output: Option<String>,
}

impl Event {
    /// Decode one JSON line
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the line is not a valid event.
    pub fn from_slice(line: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(line)
    }

    /// Test name, if this event belongs to a test rather than a package
    #[must_use]
    pub fn test_name(&self) -> Option<&str> {
        self.test.as_deref().filter(|name| !name.is_empty())
    }
}

/// Accumulated state for one test identity (`package/name`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Test {
    /// Full test name, including parent segments
    pub name: String,
    /// Owning package
    pub package: String,
    /// Output fragments in arrival order
    pub output: Vec<String>,
    /// Terminal verdict, once one arrived
    pub verdict: Option<Verdict>,
    /// Elapsed seconds reported with the verdict
    pub elapsed: Option<f64>,
    /// Time of the `run` event
    pub started_at: Option<DateTime<Utc>>,
    /// Time of the terminal event
    pub finished_at: Option<DateTime<Utc>>,
}

impl Test {
    /// Create an empty record for a test
    #[must_use]
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            output: Vec::new(),
            verdict: None,
            elapsed: None,
            started_at: None,
            finished_at: None,
        }
    }

    /// Unique identity: `package/name`
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}{}{}", self.package, NAME_SEPARATOR, self.name)
    }

    /// Last segment of the name (`Sub` for `TestA/Sub`)
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .rsplit(NAME_SEPARATOR)
            .next()
            .unwrap_or(&self.name)
    }

    /// Nesting depth below the top-level test (0 for `TestA`)
    #[must_use]
    pub fn depth(&self) -> usize {
        self.name.matches(NAME_SEPARATOR).count()
    }

    /// Elapsed time as a `Duration`, when reported and representable
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.elapsed.and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// Whether the test reported a failure
    #[must_use]
    pub fn failed(&self) -> bool {
        self.verdict == Some(Verdict::Fail)
    }

    /// Fold one event for this test into the record
    pub fn update(&mut self, event: &Event) {
        match event.action {
            Action::Output => {
                if let Some(output) = &event.output {
                    self.output.push(output.clone());
                }
            }
            Action::Run => {
                self.started_at = event.time;
            }
            action => {
                if let Some(verdict) = action.verdict() {
                    self.verdict = Some(verdict);
                    self.elapsed = event.elapsed;
                    self.finished_at = event.time;
                }
            }
        }
    }
}
