//! Error types for snapshot, pattern and codec operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Top path is not a directory.
    #[error("Top path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// An ignore pattern or filter failed to compile.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

impl SnapshotError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// A filter or ignore pattern that could not be compiled.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Invalid pattern `{pattern}`: {message}")]
    Invalid { pattern: String, message: String },
}

impl PatternError {
    pub fn invalid(pattern: impl Into<String>, message: impl ToString) -> Self {
        Self::Invalid {
            pattern: pattern.into(),
            message: message.to_string(),
        }
    }
}

/// Errors raised while decoding an encoded tree.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Input is not valid JSON.
    #[error("Malformed JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// The envelope type tag is missing or not the tree tag.
    #[error("Unexpected envelope type: {}", found.as_deref().unwrap_or("<missing>"))]
    UnexpectedType { found: Option<String> },

    /// A required envelope field is absent.
    #[error("Missing field `{field}` in envelope")]
    MissingField { field: &'static str },

    /// The payload does not have the shape of a tree.
    #[error("Invalid tree structure: {0}")]
    Structure(#[source] serde_json::Error),
}
