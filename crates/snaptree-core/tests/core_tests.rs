use serde_json::json;
use snaptree_core::{
    ENVELOPE_TYPE, ENVELOPE_VERSION, FormatError, Node, PathFilter, PathPredicate, Tree, decode,
    encode, encode_pretty, from_plain, to_plain,
};

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

fn with_suffixes() -> Tree {
    vec![
        (
            "foo",
            dir(vec![
                ("bar.md", Node::File),
                (
                    "moo",
                    dir(vec![
                        ("BAR.MD", Node::File),
                        ("thing", Node::File),
                        ("zoo", dir(vec![("BAR.md", Node::File), ("BAR.RST", Node::File)])),
                    ]),
                ),
            ]),
        ),
        (
            "zoom",
            dir(vec![
                ("blah.txt", Node::File),
                ("klang.rst", Node::File),
                ("wuub", Node::File),
            ]),
        ),
    ]
    .into_iter()
    .collect()
}

fn with_metadata() -> Tree {
    let mut tree = basic().with_metadata(json!({"snapshot": 7, "host": "build-01"}));
    if let Some(Node::Directory(h)) = tree.get_mut("h") {
        h.set_metadata(json!(["x", 1.5, false]));
    }
    tree
}

#[test]
fn test_round_trip_laws() {
    for tree in [Tree::new(), basic(), with_suffixes(), with_metadata()] {
        assert_eq!(from_plain(to_plain(&tree)).unwrap(), tree);

        let text = encode(&tree).unwrap();
        let decoded = decode(&text).unwrap();
        assert_eq!(decoded, tree);
        assert_eq!(encode(&decoded).unwrap(), text);
    }
}

#[test]
fn test_float_metadata_round_trips_exactly() {
    let floats = [
        1.079907802215119e-66,
        0.1 + 0.2,
        5e-324,
        2.2250738585072014e-308,
        f64::MAX,
        -123456.789012,
    ];
    for value in floats {
        let mut tree = basic().with_metadata(json!(value));
        if let Some(Node::Directory(h)) = tree.get_mut("h") {
            h.set_metadata(json!({"weight": value}));
        }

        let decoded = decode(&encode(&tree).unwrap()).unwrap();
        assert_eq!(decoded, tree, "metadata {value:e} changed");
        assert_eq!(decoded.metadata().and_then(serde_json::Value::as_f64), Some(value));
        assert_eq!(decode(&encode_pretty(&tree).unwrap()).unwrap(), tree);
    }
}

#[test]
fn test_envelope_fields() {
    let text = encode_pretty(&with_metadata()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["type"], ENVELOPE_TYPE);
    assert_eq!(value["version"], ENVELOPE_VERSION);
    assert_eq!(value["tree"]["metadata"]["snapshot"], 7);
    assert_eq!(value["tree"]["contents"]["j"]["contents"]["a"], serde_json::Value::Null);
    assert!(value["tree"]["contents"]["a"].get("metadata").is_none());
}

#[test]
fn test_decode_rejects_other_tags() {
    let tree_json = serde_json::to_string(&to_plain(&basic())).unwrap();
    let text = format!(r#"{{"type":"FSTree","version":"1.0.0","tree":{tree_json}}}"#);
    assert!(matches!(decode(&text), Err(FormatError::UnexpectedType { .. })));

    let text = format!(r#"{{"type":"Tree","version":"1.0.0","tree":{{"contents":{{"a":"file"}}}}}}"#);
    assert!(matches!(decode(&text), Err(FormatError::Structure(_))));
}

#[test]
fn test_tree_embeds_in_serde_documents() {
    #[derive(serde::Serialize, serde::Deserialize)]
    struct Report {
        name: String,
        tree: Tree,
    }

    let report = Report {
        name: "nightly".to_string(),
        tree: with_metadata(),
    };
    let text = serde_json::to_string(&report).unwrap();
    let back: Report = serde_json::from_str(&text).unwrap();
    assert_eq!(back.tree, report.tree);
}

#[test]
fn test_filter_identity_without_predicates() {
    let tree = with_metadata();
    let none: &[PathFilter] = &[];
    assert_eq!(tree.filter(none), tree);
}

#[test]
fn test_filter_single_path() {
    let filtered = basic().filter(&PathFilter::many(["j/a"]).unwrap());
    let expected: Tree = vec![("j", dir(vec![("a", Node::File)]))].into_iter().collect();
    assert_eq!(filtered, expected);
}

#[test]
fn test_filter_by_suffix() {
    let tree = with_suffixes();

    let md = tree.filter(&PathFilter::many([r".*\.md$"]).unwrap());
    assert_eq!(md.file_paths(), vec!["foo/bar.md", "foo/moo/zoo/BAR.md"]);

    let md_any_case = tree.filter(&PathFilter::many([r"(?i).*\.md$"]).unwrap());
    assert_eq!(
        md_any_case.file_paths(),
        vec!["foo/bar.md", "foo/moo/BAR.MD", "foo/moo/zoo/BAR.md"]
    );

    let docs = tree.filter(&PathFilter::many([r".*\.md$", r".*\.rst$"]).unwrap());
    assert_eq!(
        docs.file_paths(),
        vec!["foo/bar.md", "foo/moo/zoo/BAR.md", "zoom/klang.rst"]
    );
}

#[test]
fn test_filter_prunes_cascading() {
    let tree = with_suffixes();
    let filtered = tree.filter(&PathFilter::many(["foo/moo/zoo/BAR.RST"]).unwrap());

    assert_eq!(filtered.len(), 1);
    let foo = filtered["foo"].as_tree().unwrap();
    assert_eq!(foo.len(), 1);
    let moo = foo["moo"].as_tree().unwrap();
    assert_eq!(moo.len(), 1);
    assert_eq!(filtered.file_paths(), vec!["foo/moo/zoo/BAR.RST"]);
}

#[test]
fn test_filter_result_round_trips() {
    let filtered = with_metadata().filter(&PathFilter::many(["h/"]).unwrap());
    assert_eq!(decode(&encode(&filtered).unwrap()).unwrap(), filtered);
    assert!(filtered.metadata().is_some());
}

#[test]
fn test_custom_predicate_type() {
    struct Depth(usize);

    impl PathPredicate for Depth {
        fn matches(&self, path: &str) -> bool {
            path.split('/').count() == self.0
        }
    }

    let shallow = basic().filter(&[Depth(2)]);
    assert_eq!(shallow.file_paths(), vec!["a/b", "a/f", "j/a"]);
}

#[test]
fn test_stats_on_fixture() {
    let stats = with_suffixes().stats();
    assert_eq!(stats.files, 8);
    assert_eq!(stats.dirs, 4);
    assert_eq!(stats.max_depth, 4);
}
