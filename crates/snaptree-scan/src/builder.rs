//! Link-following snapshot builder.

use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::time::Instant;

use snaptree_core::{Node, PathFilter, SnapshotConfig, SnapshotError, Tree};
use tracing::{debug, info, trace};

use crate::ignores::{GitignoreMatcher, IgnoreCandidate, IgnorePredicate};
use crate::resolver::PathResolver;
use crate::seen::SeenPaths;
use crate::summary::WalkSummary;

/// Builds [`Tree`] snapshots of directories.
///
/// The walk is depth-first and sequential, visiting names in sorted order.
/// Links are followed. Every entry is skipped when it is ignored, when its
/// real path falls outside the valid roots, or when that real path was
/// already included earlier in the walk. Directories left empty are pruned.
pub struct TreeBuilder<'a> {
    resolver: PathResolver,
    ignore: Option<&'a dyn IgnorePredicate>,
}

impl<'a> TreeBuilder<'a> {
    /// Create a builder bounded by `valid_roots`.
    pub fn new<I, P>(valid_roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            resolver: PathResolver::new(valid_roots),
            ignore: None,
        }
    }

    /// Skip entries the predicate reports as ignored.
    pub fn with_ignore(mut self, ignore: &'a dyn IgnorePredicate) -> Self {
        self.ignore = Some(ignore);
        self
    }

    /// Snapshot the directory at `top`.
    pub fn build(&self, top: impl AsRef<Path>) -> Result<Tree, SnapshotError> {
        self.build_with_summary(top).map(|(tree, _)| tree)
    }

    /// Snapshot the directory at `top` and report what was skipped.
    ///
    /// An ignored top, or one outside every root, yields an empty tree.
    /// Failing to list a directory aborts the walk.
    pub fn build_with_summary(
        &self,
        top: impl AsRef<Path>,
    ) -> Result<(Tree, WalkSummary), SnapshotError> {
        let start = Instant::now();
        let top = top.as_ref();
        debug!(top = %top.display(), roots = self.resolver.roots().len(), "Starting snapshot");

        if self.is_ignored(&IgnoreCandidate::Top(top)) {
            debug!("Top is ignored, nothing to walk");
            return Ok((Tree::new(), WalkSummary::new()));
        }
        let Some(real_top) = self.resolver.resolve(top) else {
            debug!("Top is outside every valid root, nothing to walk");
            return Ok((Tree::new(), WalkSummary::new()));
        };
        if !real_top.is_dir() {
            return Err(SnapshotError::NotADirectory {
                path: top.to_path_buf(),
            });
        }

        let mut walk = Walk {
            builder: self,
            seen: SeenPaths::new(),
            summary: WalkSummary::new(),
        };
        let tree = walk.level(top, "")?;

        let mut summary = walk.summary;
        summary.elapsed = start.elapsed();
        info!(
            files = summary.files,
            dirs = summary.dirs,
            skipped = summary.skipped(),
            duplicates = summary.duplicates,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Snapshot complete"
        );
        Ok((tree, summary))
    }

    fn is_ignored(&self, candidate: &IgnoreCandidate<'_>) -> bool {
        self.ignore.is_some_and(|ignore| ignore.is_ignored(candidate))
    }
}

/// State for one walk. Dropped when the walk ends.
struct Walk<'b, 'a> {
    builder: &'b TreeBuilder<'a>,
    seen: SeenPaths,
    summary: WalkSummary,
}

impl Walk<'_, '_> {
    /// Snapshot one directory level. `dir` is the path as reached through
    /// links, `rel` its `/`-joined path below the top.
    fn level(&mut self, dir: &Path, rel: &str) -> Result<Tree, SnapshotError> {
        let mut names = fs::read_dir(dir)
            .map_err(|e| SnapshotError::io(dir, e))?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect::<Result<Vec<OsString>, _>>()
            .map_err(|e| SnapshotError::io(dir, e))?;
        names.sort();

        let mut tree = Tree::new();
        for name in names {
            let path = dir.join(&name);
            let name = name.to_string_lossy();
            let rel_path = if rel.is_empty() {
                name.to_string()
            } else {
                format!("{rel}/{name}")
            };

            // Follows links; broken links have no metadata.
            let metadata = fs::metadata(&path).ok();
            let is_dir = metadata.as_ref().is_some_and(fs::Metadata::is_dir);

            let candidate = IgnoreCandidate::Entry {
                path: &rel_path,
                is_dir,
            };
            if self.builder.is_ignored(&candidate) {
                debug!(path = %rel_path, "Skipping ignored entry");
                self.summary.ignored += 1;
                continue;
            }

            let Some(real_path) = self.builder.resolver.resolve(&path) else {
                debug!(path = %rel_path, "Skipping entry outside valid roots");
                self.summary.outside_roots += 1;
                continue;
            };
            if !self.seen.track(real_path) {
                debug!(path = %rel_path, "Skipping already visited entry");
                self.summary.duplicates += 1;
                continue;
            }

            match metadata {
                Some(meta) if meta.is_dir() => {
                    let subtree = self.level(&path, &rel_path)?;
                    if subtree.is_empty() {
                        trace!(path = %rel_path, "Pruning empty directory");
                        self.summary.pruned_dirs += 1;
                    } else {
                        self.summary.dirs += 1;
                        tree.insert(&*name, subtree);
                    }
                }
                Some(meta) if meta.is_file() => {
                    trace!(path = %rel_path, "Adding file");
                    self.summary.files += 1;
                    tree.insert(&*name, Node::File);
                }
                _ => {
                    debug!(path = %rel_path, "Skipping entry that is neither file nor directory");
                    self.summary.other += 1;
                }
            }
        }
        Ok(tree)
    }
}

/// Snapshot `top`, keeping only entries whose real path lies under one of
/// `valid_roots`.
pub fn at_path<I, P>(
    top: impl AsRef<Path>,
    valid_roots: I,
    ignore: Option<&dyn IgnorePredicate>,
) -> Result<Tree, SnapshotError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let builder = TreeBuilder::new(valid_roots);
    match ignore {
        Some(ignore) => builder.with_ignore(ignore).build(top),
        None => builder.build(top),
    }
}

/// Run a configured snapshot: compile the patterns, walk, then filter.
pub fn snapshot(config: &SnapshotConfig) -> Result<Tree, SnapshotError> {
    snapshot_with_summary(config).map(|(tree, _)| tree)
}

pub fn snapshot_with_summary(
    config: &SnapshotConfig,
) -> Result<(Tree, WalkSummary), SnapshotError> {
    if config.valid_roots.is_empty() {
        return Err(SnapshotError::InvalidConfig {
            message: "At least one valid root is required".to_string(),
        });
    }

    let matcher = if config.ignore_patterns.is_empty() {
        None
    } else {
        Some(GitignoreMatcher::new(&config.ignore_patterns)?)
    };
    let filters = PathFilter::many(&config.filters)?;

    let mut builder = TreeBuilder::new(&config.valid_roots);
    if let Some(ref matcher) = matcher {
        builder = builder.with_ignore(matcher);
    }
    let (tree, summary) = builder.build_with_summary(&config.top)?;
    Ok((tree.filter(&filters), summary))
}
