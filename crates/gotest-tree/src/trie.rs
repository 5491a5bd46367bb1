// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Hierarchy trie grouping test records by package and name segments
//!
//! `go test -json` never states which test is the parent of another; the
//! relation is encoded in the name (`TestA/Sub` is a child of `TestA`). The
//! trie makes that structure explicit while events are ingested:
//!
//! ```text
//! root
//! └── pkg                 (package node, no test)
//!     └── TestA           pkg/TestA
//!         └── Sub         pkg/TestA/Sub
//! ```
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Children keep
//! first-seen order.

use std::collections::HashMap;

use tracing::trace;

use crate::error::NameTooDeep;
use crate::event::{Event, NAME_SEPARATOR, Test};

/// Deepest test name accepted, in `/`-separated segments
///
/// Reconstructed trees are dropped and serialized recursively, so nesting is
/// bounded here rather than left to the stack.
pub const MAX_NAME_SEGMENTS: usize = 256;

/// Index of a node in the trie arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The synthetic root
    pub const ROOT: NodeId = NodeId(0);
}

#[derive(Debug, Default)]
struct Node {
    test: Option<Test>,
    children: Vec<NodeId>,
    by_segment: HashMap<String, NodeId>,
}

/// Ordered forest of tests keyed by `package` then each name segment
#[derive(Debug)]
pub struct HierarchyTrie {
    nodes: Vec<Node>,
}

impl Default for HierarchyTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyTrie {
    /// Create a trie holding only the root
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    /// Fold one event into the test it names, creating the test on first sight
    ///
    /// Package-level events (no test name) are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`NameTooDeep`] without touching the trie when the test name
    /// has more than [`MAX_NAME_SEGMENTS`] segments.
    pub fn fold(&mut self, event: &Event) -> Result<(), NameTooDeep> {
        let Some(name) = event.test_name() else {
            return Ok(());
        };

        let segments = name.split(NAME_SEPARATOR).count();
        if segments > MAX_NAME_SEGMENTS {
            return Err(NameTooDeep {
                segments,
                limit: MAX_NAME_SEGMENTS,
            });
        }

        let id = self.resolve(&event.package, name);
        let node = &mut self.nodes[id.0];
        let test = node.test.get_or_insert_with(|| {
            trace!(package = %event.package, test = name, "new test");
            Test::new(event.package.clone(), name)
        });
        test.update(event);
        Ok(())
    }

    /// Find the node for `package/name` without creating anything
    #[must_use]
    pub fn find(&self, package: &str, name: &str) -> Option<NodeId> {
        let mut current = self.child(NodeId::ROOT, package)?;
        for segment in name.split(NAME_SEPARATOR) {
            current = self.child(current, segment)?;
        }
        Some(current)
    }

    /// Test attached to a node, if any
    #[must_use]
    pub fn test(&self, id: NodeId) -> Option<&Test> {
        self.nodes.get(id.0).and_then(|node| node.test.as_ref())
    }

    pub(crate) fn test_mut(&mut self, id: NodeId) -> Option<&mut Test> {
        self.nodes.get_mut(id.0).and_then(|node| node.test.as_mut())
    }

    /// Children of a node in first-seen order
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    /// Package nodes, in first-seen order
    #[must_use]
    pub fn packages(&self) -> &[NodeId] {
        self.children(NodeId::ROOT)
    }

    /// Top-level test nodes across all packages, in first-seen order
    pub fn top_level(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.packages()
            .iter()
            .flat_map(|&pkg| self.children(pkg).iter().copied())
    }

    /// Number of nodes that carry a test
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.test.is_some()).count()
    }

    fn child(&self, parent: NodeId, segment: &str) -> Option<NodeId> {
        self.nodes
            .get(parent.0)
            .and_then(|node| node.by_segment.get(segment).copied())
    }

    fn child_or_insert(&mut self, parent: NodeId, segment: &str) -> NodeId {
        if let Some(id) = self.child(parent, segment) {
            return id;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::default());
        let parent = &mut self.nodes[parent.0];
        parent.children.push(id);
        parent.by_segment.insert(segment.to_string(), id);
        id
    }

    fn resolve(&mut self, package: &str, name: &str) -> NodeId {
        let mut current = self.child_or_insert(NodeId::ROOT, package);
        for segment in name.split(NAME_SEPARATOR) {
            current = self.child_or_insert(current, segment);
        }
        current
    }
}
