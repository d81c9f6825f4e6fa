//! Entry kinds stored in a tree level.

use serde::{Deserialize, Serialize};

use crate::tree::Tree;

/// What a name in a [`Tree`] level refers to.
///
/// Serializes as `null` for files and as a nested tree object for
/// directories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Regular file.
    File,
    /// Subdirectory.
    Directory(Tree),
}

impl Node {
    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, Node::File)
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    /// Borrow the subtree of a directory.
    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Node::Directory(tree) => Some(tree),
            Node::File => None,
        }
    }

    pub fn as_tree_mut(&mut self) -> Option<&mut Tree> {
        match self {
            Node::Directory(tree) => Some(tree),
            Node::File => None,
        }
    }
}

impl From<Tree> for Node {
    fn from(tree: Tree) -> Self {
        Node::Directory(tree)
    }
}
