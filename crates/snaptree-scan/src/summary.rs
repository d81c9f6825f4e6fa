//! Walk summary counters.

use std::time::Duration;

/// What a walk kept and why it dropped the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Files included in the tree.
    pub files: u64,
    /// Directories included in the tree.
    pub dirs: u64,
    /// Entries skipped by the ignore predicate.
    pub ignored: u64,
    /// Entries whose real path is outside every root or cannot be resolved.
    pub outside_roots: u64,
    /// Entries whose real path was already included elsewhere.
    pub duplicates: u64,
    /// Directories dropped because nothing in them survived.
    pub pruned_dirs: u64,
    /// Entries that are neither files nor directories.
    pub other: u64,
    /// Time spent walking.
    pub elapsed: Duration,
}

impl WalkSummary {
    /// Create an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total entries looked at, kept or not.
    pub fn total_entries(&self) -> u64 {
        self.files
            + self.dirs
            + self.ignored
            + self.outside_roots
            + self.duplicates
            + self.pruned_dirs
            + self.other
    }

    /// Total entries dropped.
    pub fn skipped(&self) -> u64 {
        self.total_entries() - self.files - self.dirs
    }
}
