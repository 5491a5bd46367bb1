// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gotest-tree: nested test trees from `go test -json` streams
//!
//! Go reports subtests as flat events whose hierarchy lives only in the test
//! name (`TestA/Sub`), and every test's captured output embeds the console
//! output of its subtests. This crate rebuilds the hierarchy and gives each
//! node a log holding only its own subtree, with verdict banners ordered by
//! depth and the common indentation removed.
//!
//! # Example
//!
//! ```no_run
//! use gotest_tree::{CancelToken, Reader};
//!
//! let stdin = std::io::stdin().lock();
//! let set = Reader::new(stdin).read_all(&CancelToken::new()).unwrap();
//!
//! if let Some(errors) = &set.errors {
//!     eprintln!("skipped lines:\n{errors}");
//! }
//! for test in set.iter() {
//!     println!("{} {:?}", test.test.name, test.test.verdict);
//! }
//! ```

pub mod error;
pub mod event;
pub mod log;
pub mod reader;
pub mod trie;

pub use error::{DecodeErrors, LineError, LineErrorKind, NameTooDeep, ReadError};
pub use event::{Action, Event, Test, Verdict};
pub use log::{INDENT_UNIT, NestedTest, is_result_line};
pub use reader::{CancelToken, Reader, TestSet, TestSetSummary};
pub use trie::{HierarchyTrie, MAX_NAME_SEGMENTS, NodeId};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{DecodeErrors, ReadError};
    pub use crate::event::{Test, Verdict};
    pub use crate::log::NestedTest;
    pub use crate::reader::{CancelToken, Reader, TestSet};
}
