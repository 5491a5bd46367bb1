// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for gotest-tree

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Fatal errors that abort a run and discard any partially built tree
#[derive(Debug, Error)]
pub enum ReadError {
    /// The cancellation token was raised while the stream was being consumed
    #[error("read cancelled after {lines_read} line(s)")]
    Cancelled {
        /// Number of input lines consumed before cancellation was observed
        lines_read: usize,
    },
}

/// A test name nested deeper than the trie accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("test name has {segments} segments, limit is {limit}")]
pub struct NameTooDeep {
    /// Segments in the rejected name
    pub segments: usize,
    /// Maximum accepted segments
    pub limit: usize,
}

/// What went wrong with a single input line
#[derive(Debug, Error)]
pub enum LineErrorKind {
    /// The line is not a valid test event
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// The underlying reader failed; ingestion stopped at this line
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// The event decoded but its test name nests too deep; it was dropped
    #[error("{0}")]
    NameTooDeep(#[from] NameTooDeep),
}

/// A non-fatal error tied to one input line
#[derive(Debug, Error)]
#[error("line {line}: {kind}")]
pub struct LineError {
    /// 1-based line number in the input stream
    pub line: usize,
    /// Underlying cause
    #[source]
    pub kind: LineErrorKind,
}

impl LineError {
    /// Whether this error ended ingestion early
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self.kind, LineErrorKind::Io(_))
    }
}

/// All non-fatal line errors of a run, joined into one value
///
/// Displayed one error per line.
#[derive(Debug, Default)]
pub struct DecodeErrors {
    errors: Vec<LineError>,
}

impl DecodeErrors {
    pub(crate) fn push(&mut self, err: LineError) {
        self.errors.push(err);
    }

    /// Collapse into `None` when nothing was recorded
    pub(crate) fn into_option(self) -> Option<Self> {
        if self.errors.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// Number of recorded errors
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether no errors were recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate over the recorded errors in input order
    pub fn iter(&self) -> std::slice::Iter<'_, LineError> {
        self.errors.iter()
    }
}

impl fmt::Display for DecodeErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.errors.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DecodeErrors {}

/// Serialized as a list of messages, one per line error
impl Serialize for DecodeErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.errors.iter().map(ToString::to_string))
    }
}

impl<'a> IntoIterator for &'a DecodeErrors {
    type Item = &'a LineError;
    type IntoIter = std::slice::Iter<'a, LineError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
