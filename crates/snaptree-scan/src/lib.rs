//! Directory walking engine for snaptree.
//!
//! This crate walks a directory and builds a [`Tree`] snapshot of it.
//!
//! # Overview
//!
//! - **Links are followed** and every visited path is canonicalized
//! - **Valid roots** bound where a link may lead; anything resolving
//!   elsewhere is dropped
//! - **Cycle safety** comes from a walk-wide set of visited real paths: a
//!   target reached a second time is skipped
//! - **Ignore predicates**, gitignore syntax out of the box
//! - **Deterministic**: names are visited in sorted order
//!
//! # Example
//!
//! ```rust,no_run
//! use snaptree_scan::{GitignoreMatcher, TreeBuilder};
//!
//! let ignores = GitignoreMatcher::new(["target/", "*.log"]).unwrap();
//! let tree = TreeBuilder::new(["/srv/project", "/srv/shared"])
//!     .with_ignore(&ignores)
//!     .build("/srv/project")
//!     .unwrap();
//!
//! for path in tree.file_paths() {
//!     println!("{path}");
//! }
//! ```

mod builder;
mod ignores;
mod resolver;
mod seen;
mod summary;

pub use builder::{TreeBuilder, at_path, snapshot, snapshot_with_summary};
pub use ignores::{GitignoreMatcher, IgnoreCandidate, IgnorePredicate};
pub use resolver::PathResolver;
pub use seen::SeenPaths;
pub use summary::WalkSummary;

// Re-export core types for convenience
pub use snaptree_core::{
    FormatError, Node, PathFilter, PathPredicate, PatternError, SnapshotConfig, SnapshotError,
    Tree, TreeStats,
};
