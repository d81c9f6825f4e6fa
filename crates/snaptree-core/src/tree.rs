//! Snapshot tree container and statistics.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::ops::Index;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::node::Node;

/// One directory level of a snapshot.
///
/// Names map to [`Node::File`] or to a nested [`Tree`]. Each level may carry
/// an opaque JSON metadata value. Names are kept sorted so traversal and
/// serialization are deterministic.
///
/// A tree is empty when it has no contents, whatever its metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    contents: BTreeMap<CompactString, Node>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Value>,
}

impl Tree {
    /// Create an empty tree with no metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`Tree::set_metadata`].
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.set_metadata(metadata);
        self
    }

    /// Attach metadata to this level. `null` clears it.
    pub fn set_metadata(&mut self, metadata: Value) {
        self.metadata = match metadata {
            Value::Null => None,
            value => Some(value),
        };
    }

    pub fn clear_metadata(&mut self) -> Option<Value> {
        self.metadata.take()
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }

    pub fn contents(&self) -> &BTreeMap<CompactString, Node> {
        &self.contents
    }

    /// Look up an entry at this level only.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.contents.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.contents.get_mut(name)
    }

    /// Insert or replace an entry, returning the previous one.
    pub fn insert(&mut self, name: impl Into<CompactString>, node: impl Into<Node>) -> Option<Node> {
        self.contents.insert(name.into(), node.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Node> {
        self.contents.remove(name)
    }

    /// Number of direct entries.
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// True if this level has no entries. Metadata is not considered.
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Iterate direct entries in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, CompactString, Node> {
        self.contents.iter()
    }

    /// Every file in the tree as a `/`-joined path, in sorted order.
    pub fn file_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_file_paths("", &mut paths);
        paths
    }

    fn collect_file_paths(&self, prefix: &str, out: &mut Vec<String>) {
        for (name, node) in &self.contents {
            let path = join_path(prefix, name);
            match node {
                Node::File => out.push(path),
                Node::Directory(subtree) => subtree.collect_file_paths(&path, out),
            }
        }
    }

    /// Compute summary statistics for the whole tree.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::new();
        self.accumulate_stats(1, &mut stats);
        stats
    }

    fn accumulate_stats(&self, depth: u32, stats: &mut TreeStats) {
        for node in self.contents.values() {
            match node {
                Node::File => stats.record_file(depth),
                Node::Directory(subtree) => {
                    stats.record_dir(depth);
                    subtree.accumulate_stats(depth + 1, stats);
                }
            }
        }
    }
}

/// Join a tree path prefix and an entry name with `/`.
pub(crate) fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

impl Index<&str> for Tree {
    type Output = Node;

    /// Panics if `name` is not present at this level.
    fn index(&self, name: &str) -> &Node {
        match self.contents.get(name) {
            Some(node) => node,
            None => panic!("no entry named `{name}` in tree"),
        }
    }
}

impl<K: Into<CompactString>> FromIterator<(K, Node)> for Tree {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        Self {
            contents: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            metadata: None,
        }
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = (&'a CompactString, &'a Node);
    type IntoIter = btree_map::Iter<'a, CompactString, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Summary statistics for a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total number of files.
    pub files: u64,
    /// Total number of directories, not counting the root.
    pub dirs: u64,
    /// Deepest level holding an entry (root entries are depth 1).
    pub max_depth: u32,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_file(&mut self, depth: u32) {
        self.files += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    pub fn record_dir(&mut self, depth: u32) {
        self.dirs += 1;
        self.max_depth = self.max_depth.max(depth);
    }
}
