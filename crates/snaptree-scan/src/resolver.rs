//! Real-path resolution bounded by a set of valid roots.

use std::path::{Path, PathBuf};

use tracing::warn;

/// Resolves paths to their canonical form and checks root containment.
///
/// Roots are canonicalized once, when the resolver is created. A path is
/// contained when its canonical form equals a root or lies below it,
/// compared component by component.
#[derive(Debug, Clone)]
pub struct PathResolver {
    roots: Vec<PathBuf>,
}

impl PathResolver {
    /// Create a resolver from valid root paths.
    ///
    /// Roots that cannot be canonicalized (usually because they do not
    /// exist) are dropped: no existing path can resolve below them.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut canonical: Vec<PathBuf> = Vec::new();
        for root in roots {
            let root = root.as_ref();
            match root.canonicalize() {
                Ok(real) if !canonical.contains(&real) => canonical.push(real),
                Ok(_) => {}
                Err(err) => {
                    warn!(root = %root.display(), error = %err, "Dropping valid root that cannot be canonicalized");
                }
            }
        }
        Self { roots: canonical }
    }

    /// The canonical roots in the order given.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Canonicalize `path`, following every link.
    ///
    /// Returns `None` if the path cannot be canonicalized or resolves
    /// outside every root. Neither case is an error.
    pub fn resolve(&self, path: &Path) -> Option<PathBuf> {
        let real = path.canonicalize().ok()?;
        self.contains(&real).then_some(real)
    }

    /// Check whether an already canonical path lies within a root.
    pub fn contains(&self, real_path: &Path) -> bool {
        self.roots.iter().any(|root| real_path.starts_with(root))
    }
}
