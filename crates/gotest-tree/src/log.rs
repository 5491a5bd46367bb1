// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Per-subtest log reconstruction
//!
//! The output captured for a Go test already contains the console output of
//! its subtests, indented by [`INDENT_UNIT`] per nesting level, and the
//! `--- PASS`/`--- FAIL`/`--- SKIP` banners trail the output they summarize in
//! capture order rather than depth order. The walk in this module writes every
//! node's raw output into one [`LogArena`] per top-level test, depth first, and
//! after a node's children are done slices out the bytes written since the
//! node started. That slice is exactly the node's subtree. Result lines are
//! then moved behind the narrative lines, shallowest first, and the common
//! indentation is removed.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::event::{Test, Verdict};
use crate::trie::{HierarchyTrie, NodeId};

/// Whitespace printed by `go test` for one level of subtest nesting
pub const INDENT_UNIT: &str = "    ";

/// Whether a captured line is a verdict banner (`--- FAIL: TestA (0.01s)`)
///
/// Matches any line containing `---` together with an upper-cased verdict
/// token anywhere in it, so a narrative line holding both is classified as a
/// result line too.
#[must_use]
pub fn is_result_line(line: &str) -> bool {
    line.contains("---")
        && Verdict::ALL
            .iter()
            .any(|verdict| line.contains(verdict.banner()))
}

/// Number of leading [`INDENT_UNIT`]s on a line
#[must_use]
pub fn indent_units(line: &str) -> usize {
    let mut rest = line;
    let mut count = 0;
    while let Some(stripped) = rest.strip_prefix(INDENT_UNIT) {
        rest = stripped;
        count += 1;
    }
    count
}

/// Remove up to `units` leading [`INDENT_UNIT`]s
fn strip_indent(line: &str, units: usize) -> &str {
    let mut rest = line;
    for _ in 0..units {
        match rest.strip_prefix(INDENT_UNIT) {
            Some(stripped) => rest = stripped,
            None => break,
        }
    }
    rest
}

/// A test together with its reconstructed subtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedTest {
    /// Snapshot of the test record; its raw output has been consumed
    pub test: Test,
    /// Subtests in first-seen order
    pub children: Vec<NestedTest>,
    /// Finished log for this subtree
    pub log: String,
}

impl NestedTest {
    /// Depth-first, pre-order iterator over this node and all descendants
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Direct child whose display name is `name`
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&NestedTest> {
        self.children
            .iter()
            .find(|child| child.test.display_name() == name)
    }
}

/// Pre-order iterator returned by [`NestedTest::iter`]
#[derive(Debug)]
pub struct Iter<'a> {
    stack: Vec<&'a NestedTest>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a NestedTest;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Growable log shared by every node of one top-level walk
///
/// Only ever appended to; nodes remember where their own contribution starts.
#[derive(Debug, Default)]
pub struct LogArena {
    buf: String,
}

impl LogArena {
    /// Create an empty arena
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: String::with_capacity(64),
        }
    }

    /// Bytes written so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn push_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    /// Everything written from `start` onwards
    fn tail(&self, start: usize) -> Option<&str> {
        self.buf.get(start..)
    }
}

/// View of a [`LogArena`] for one node: where it starts and how deep it is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Branch {
    start: usize,
    depth: usize,
}

impl Branch {
    /// Branch for a top-level test on a fresh arena
    #[must_use]
    pub fn root() -> Self {
        Self { start: 0, depth: 0 }
    }

    /// Branch for a child: one level deeper, starting at the arena's end
    #[must_use]
    pub fn descend(self, arena: &LogArena) -> Self {
        Self {
            start: arena.len(),
            depth: self.depth + 1,
        }
    }

    /// Indentation prefix for result lines written at this depth
    #[must_use]
    pub fn prefix(self) -> String {
        INDENT_UNIT.repeat(self.depth)
    }
}

/// Reconstruct the tree rooted at a top-level test node
///
/// Each call uses its own arena. Returns `None` when the node carries no test.
pub fn walk_top_level(trie: &mut HierarchyTrie, id: NodeId) -> Option<NestedTest> {
    let mut arena = LogArena::new();
    walk(trie, id, &mut arena, Branch::root())
}

/// Reconstruct the subtree rooted at `id`, writing into `arena`
///
/// The node's raw output is moved out of the trie, so walking the same node
/// twice yields an empty log the second time. Children that cannot be
/// reconstructed are left out of the result.
///
/// The traversal keeps its own stack of open nodes, so nesting depth is not
/// limited by the thread's call stack.
pub fn walk(
    trie: &mut HierarchyTrie,
    id: NodeId,
    arena: &mut LogArena,
    branch: Branch,
) -> Option<NestedTest> {
    let mut stack = vec![Frame::enter(trie, id, arena, branch)?];

    loop {
        let top = stack.last_mut()?;
        if let Some(child) = top.pending.next() {
            let child_branch = top.branch.descend(arena);
            match Frame::enter(trie, child, arena, child_branch) {
                Some(frame) => stack.push(frame),
                None => trace!(parent = %top.test.name, "skipping subtree without a test"),
            }
            continue;
        }

        let frame = stack.pop()?;
        let finished = frame.finish(arena);
        match (stack.last_mut(), finished) {
            (None, finished) => return finished,
            (Some(parent), Some(nested)) => parent.children.push(nested),
            (Some(parent), None) => {
                trace!(parent = %parent.test.name, "skipping subtree without a log");
            }
        }
    }
}

/// A node whose raw output is in the arena but whose children are not all done
struct Frame {
    branch: Branch,
    test: Test,
    pending: std::vec::IntoIter<NodeId>,
    children: Vec<NestedTest>,
}

impl Frame {
    /// Move the node's output into the arena and queue its children
    fn enter(
        trie: &mut HierarchyTrie,
        id: NodeId,
        arena: &mut LogArena,
        branch: Branch,
    ) -> Option<Self> {
        let test = trie.test_mut(id)?;
        let output = std::mem::take(&mut test.output);
        let test = test.clone();

        let prefix = branch.prefix();
        for fragment in &output {
            if is_result_line(fragment) {
                arena.push_str(&prefix);
            }
            arena.push_str(fragment);
        }

        let child_ids = trie.children(id).to_vec();
        Some(Self {
            branch,
            test,
            children: Vec::with_capacity(child_ids.len()),
            pending: child_ids.into_iter(),
        })
    }

    /// Slice this node's subtree out of the arena and finish its log
    fn finish(self, arena: &LogArena) -> Option<NestedTest> {
        let Some(raw) = arena.tail(self.branch.start) else {
            trace!(test = %self.test.name, start = self.branch.start, "log start out of range");
            return None;
        };
        Some(NestedTest {
            log: reconstruct(raw),
            test: self.test,
            children: self.children,
        })
    }
}

/// Turn a subtree's raw captured text into its finished log
///
/// Narrative lines keep their order; result lines follow them sorted by
/// indentation (stable), and the smallest indentation found on a result line
/// is stripped from every line.
#[must_use]
pub fn reconstruct(raw: &str) -> String {
    let (mut results, mut lines): (Vec<&str>, Vec<&str>) =
        raw.split_inclusive('\n').partition(|line| is_result_line(line));

    // Without a result line there is no depth to anchor on, so nothing is
    // stripped rather than every leading indent unit.
    let min_units = results
        .iter()
        .map(|line| indent_units(line))
        .min()
        .unwrap_or(0);

    results.sort_by_key(|line| indent_units(line));
    lines.extend(results);

    let mut log = String::with_capacity(raw.len() + 1);
    let last = lines.len().saturating_sub(1);
    for (idx, line) in lines.into_iter().enumerate() {
        log.push_str(strip_indent(line, min_units));
        if idx != last && !line.ends_with('\n') {
            log.push('\n');
        }
    }
    log
}
