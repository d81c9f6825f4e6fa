//! Snapshot configuration types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;

/// Configuration for a snapshot walk.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct SnapshotConfig {
    /// Directory to start walking from.
    pub top: PathBuf,

    /// Only entries whose real path lies under one of these are kept.
    #[builder(default)]
    #[serde(default)]
    pub valid_roots: Vec<PathBuf>,

    /// Patterns to ignore (gitignore syntax), relative to `top`.
    #[builder(default)]
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Regex filters applied to the finished tree. Empty keeps everything.
    #[builder(default)]
    #[serde(default)]
    pub filters: Vec<String>,
}

impl SnapshotConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.top {
            Some(ref top) if top.as_os_str().is_empty() => {
                return Err("Top path cannot be empty".to_string());
            }
            Some(_) => {}
            None => return Err("Top path is required".to_string()),
        }
        if self.valid_roots.as_ref().is_none_or(Vec::is_empty) {
            return Err("At least one valid root is required".to_string());
        }
        Ok(())
    }
}

impl SnapshotConfig {
    /// Create a new snapshot config builder.
    pub fn builder() -> SnapshotConfigBuilder {
        SnapshotConfigBuilder::default()
    }

    /// Snapshot `top`, using it as the only valid root.
    pub fn new(top: impl Into<PathBuf>) -> Self {
        let top = top.into();
        Self {
            valid_roots: vec![top.clone()],
            top,
            ignore_patterns: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Parse a TOML document. Missing `valid_roots` fall back to `[top]`.
    pub fn from_toml_str(text: &str) -> Result<Self, SnapshotError> {
        let mut config: Self = toml::from_str(text).map_err(|e| SnapshotError::InvalidConfig {
            message: e.to_string(),
        })?;
        if config.top.as_os_str().is_empty() {
            return Err(SnapshotError::InvalidConfig {
                message: "Top path cannot be empty".to_string(),
            });
        }
        if config.valid_roots.is_empty() {
            config.valid_roots.push(config.top.clone());
        }
        Ok(config)
    }

    /// Load a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| SnapshotError::io(path, e))?;
        Self::from_toml_str(&text)
    }
}
