//! Core types for snaptree.
//!
//! This crate provides the snapshot [`Tree`] data structure, path-pattern
//! filtering over it, its envelope encoding, and configuration.

pub mod codec;
mod config;
mod error;
mod filter;
mod node;
mod tree;

pub use codec::{ENVELOPE_TYPE, ENVELOPE_VERSION, decode, encode, encode_pretty, from_plain, to_plain};
pub use config::{SnapshotConfig, SnapshotConfigBuilder};
pub use error::{FormatError, PatternError, SnapshotError};
pub use filter::{PathFilter, PathPredicate};
pub use node::Node;
pub use tree::{Tree, TreeStats};
