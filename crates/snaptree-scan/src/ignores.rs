//! Ignore predicates consulted during a walk.

use std::path::{Component, Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use snaptree_core::PatternError;

/// What the walker asks an ignore predicate about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreCandidate<'a> {
    /// The top directory of the walk, as given by the caller.
    Top(&'a Path),
    /// An entry below the top.
    Entry {
        /// Path relative to the top, joined with `/`.
        path: &'a str,
        /// Whether the entry is a directory after following links.
        is_dir: bool,
    },
}

/// Decides whether an entry is skipped.
pub trait IgnorePredicate {
    fn is_ignored(&self, candidate: &IgnoreCandidate<'_>) -> bool;
}

impl<F> IgnorePredicate for F
where
    F: Fn(&IgnoreCandidate<'_>) -> bool,
{
    fn is_ignored(&self, candidate: &IgnoreCandidate<'_>) -> bool {
        self(candidate)
    }
}

/// Gitignore-syntax matcher.
///
/// Supports comments, `!` negation, trailing `/` for directories only and a
/// leading `/` to anchor a pattern at the top. The top directory itself is
/// matched by its full path with the root stripped, as a file, so anchored
/// and directory-only rules never hit the walk root itself.
#[derive(Debug, Clone)]
pub struct GitignoreMatcher {
    gitignore: Gitignore,
}

impl GitignoreMatcher {
    pub fn new<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GitignoreBuilder::new(".");
        for pattern in patterns {
            let pattern = pattern.as_ref();
            builder
                .add_line(None, pattern)
                .map_err(|e| PatternError::invalid(pattern, e))?;
        }
        let gitignore = builder
            .build()
            .map_err(|e| PatternError::invalid("<ignore set>", e))?;
        Ok(Self { gitignore })
    }

    /// Number of ignore and negation rules loaded.
    pub fn len(&self) -> usize {
        self.gitignore.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gitignore.is_empty()
    }
}

impl IgnorePredicate for GitignoreMatcher {
    fn is_ignored(&self, candidate: &IgnoreCandidate<'_>) -> bool {
        match *candidate {
            IgnoreCandidate::Top(top) => {
                let relative: PathBuf = top
                    .components()
                    .filter_map(|c| match c {
                        Component::Normal(name) => Some(name),
                        _ => None,
                    })
                    .collect();
                !relative.as_os_str().is_empty()
                    && self
                        .gitignore
                        .matched_path_or_any_parents(&relative, false)
                        .is_ignore()
            }
            IgnoreCandidate::Entry { path, is_dir } => {
                self.gitignore.matched(path, is_dir).is_ignore()
            }
        }
    }
}
