//! Walk-wide tracking of visited real paths.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Tracks canonical paths already included in a walk.
///
/// A directory reached through a second link resolves to a path that is
/// already tracked, so it is dropped instead of being expanded again. This
/// is what breaks symlink cycles. One tracker lives for exactly one walk.
#[derive(Debug, Default)]
pub struct SeenPaths {
    seen: HashSet<PathBuf>,
}

impl SeenPaths {
    /// Create a new, empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a canonical path. Returns `true` if this is the first time seeing it.
    pub fn track(&mut self, real_path: PathBuf) -> bool {
        self.seen.insert(real_path)
    }

    /// Check if a path has been seen (without tracking).
    pub fn has_seen(&self, real_path: &Path) -> bool {
        self.seen.contains(real_path)
    }

    /// Get the number of unique paths tracked.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
