//! Path-pattern filtering of snapshot trees.

use regex::Regex;

use crate::error::PatternError;
use crate::node::Node;
use crate::tree::{Tree, join_path};

/// Decides whether a `/`-joined tree path is kept.
pub trait PathPredicate {
    fn matches(&self, path: &str) -> bool;
}

impl<F> PathPredicate for F
where
    F: Fn(&str) -> bool,
{
    fn matches(&self, path: &str) -> bool {
        self(path)
    }
}

impl PathPredicate for Box<dyn PathPredicate + '_> {
    fn matches(&self, path: &str) -> bool {
        (**self).matches(path)
    }
}

/// Regex predicate that must match at the start of the path.
///
/// `foo/.*\.md` keeps `foo/bar.md` and `foo/x/y.md` but not `a/foo/bar.md`.
/// Use a leading `.*` to match anywhere and a trailing `$` to pin the end.
#[derive(Debug, Clone)]
pub struct PathFilter {
    pattern: String,
    regex: Regex,
}

impl PathFilter {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(&format!("^(?:{pattern})"))
            .map_err(|e| PatternError::invalid(pattern, e))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Compile several patterns, failing on the first bad one.
    pub fn many<I, S>(patterns: I) -> Result<Vec<Self>, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        patterns.into_iter().map(|p| Self::new(p.as_ref())).collect()
    }

    /// The pattern as given, without the start anchor.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl PathPredicate for PathFilter {
    fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

impl Tree {
    /// Copy of this tree holding only files whose path matches at least one
    /// predicate, plus the directories needed to contain them.
    ///
    /// Paths are relative to this tree and joined with `/`. Directories left
    /// without contents are dropped, which can cascade up to the root.
    /// Metadata of surviving levels is kept. No predicates means no
    /// filtering.
    pub fn filter<P: PathPredicate>(&self, predicates: &[P]) -> Tree {
        if predicates.is_empty() {
            return self.clone();
        }
        filter_level(self, "", predicates)
    }
}

fn filter_level<P: PathPredicate>(tree: &Tree, prefix: &str, predicates: &[P]) -> Tree {
    let mut filtered: Tree = tree
        .iter()
        .filter_map(|(name, node)| {
            let path = join_path(prefix, name);
            match node {
                Node::File if predicates.iter().any(|p| p.matches(&path)) => {
                    Some((name.clone(), Node::File))
                }
                Node::File => None,
                Node::Directory(subtree) => {
                    let kept = filter_level(subtree, &path, predicates);
                    (!kept.is_empty()).then(|| (name.clone(), Node::Directory(kept)))
                }
            }
        })
        .collect();

    if let Some(metadata) = tree.metadata() {
        filtered.set_metadata(metadata.clone());
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dir(entries: Vec<(&str, Node)>) -> Node {
        Node::Directory(entries.into_iter().collect())
    }

    /// `{a: {a: {d, e}, b, f}, h: {a: {i}}, j: {a}}`
    fn basic() -> Tree {
        vec![
            (
                "a",
                dir(vec![
                    ("a", dir(vec![("d", Node::File), ("e", Node::File)])),
                    ("b", Node::File),
                    ("f", Node::File),
                ]),
            ),
            ("h", dir(vec![("a", dir(vec![("i", Node::File)]))])),
            ("j", dir(vec![("a", Node::File)])),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_no_predicates_is_identity() {
        let tree = basic();
        let none: &[PathFilter] = &[];
        assert_eq!(tree.filter(none), tree);
    }

    #[test]
    fn test_single_file_match_prunes_everything_else() {
        let filters = PathFilter::many(["j/a"]).unwrap();
        let expected: Tree = vec![("j", dir(vec![("a", Node::File)]))].into_iter().collect();
        assert_eq!(basic().filter(&filters), expected);
    }

    #[test]
    fn test_predicates_are_ored() {
        let filters = PathFilter::many(["j/a", "h/"]).unwrap();
        assert_eq!(basic().filter(&filters).file_paths(), vec!["h/a/i", "j/a"]);
    }

    #[test]
    fn test_match_is_anchored_at_start() {
        let filters = PathFilter::many(["a"]).unwrap();
        assert_eq!(
            basic().filter(&filters).file_paths(),
            vec!["a/a/d", "a/a/e", "a/b", "a/f"]
        );
    }

    #[test]
    fn test_no_match_yields_empty() {
        let filters = PathFilter::many(["nothing"]).unwrap();
        assert!(basic().filter(&filters).is_empty());
    }

    #[test]
    fn test_closure_predicates() {
        let predicates = [|path: &str| path.ends_with("/i")];
        assert_eq!(basic().filter(&predicates).file_paths(), vec!["h/a/i"]);
    }

    #[test]
    fn test_boxed_predicates() {
        let predicates: Vec<Box<dyn PathPredicate>> = vec![
            Box::new(PathFilter::new("j/").unwrap()),
            Box::new(|path: &str| path == "a/f"),
        ];
        assert_eq!(basic().filter(&predicates).file_paths(), vec!["a/f", "j/a"]);
    }

    #[test]
    fn test_metadata_survives() {
        let mut tree = basic().with_metadata(json!("root"));
        if let Some(h) = tree.get_mut("h").and_then(Node::as_tree_mut) {
            h.set_metadata(json!({"kept": true}));
        }
        if let Some(a) = tree.get_mut("a").and_then(Node::as_tree_mut) {
            a.set_metadata(json!("dropped"));
        }

        let filtered = tree.filter(&PathFilter::many(["h/a/i"]).unwrap());
        assert_eq!(filtered.metadata(), Some(&json!("root")));
        assert_eq!(filtered["h"].as_tree().and_then(Tree::metadata), Some(&json!({"kept": true})));
        assert!(filtered.get("a").is_none());
    }

    #[test]
    fn test_pattern_kept_without_anchor() {
        let filter = PathFilter::new(r"h/.*").unwrap();
        assert_eq!(filter.pattern(), r"h/.*");
        assert!(filter.matches("h/a/i"));
        assert!(!filter.matches("j/h/a"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PathFilter::new("(").unwrap_err();
        assert!(matches!(err, PatternError::Invalid { ref pattern, .. } if pattern == "("));
    }
}
