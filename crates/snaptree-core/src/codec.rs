//! Conversion between trees, plain JSON values and the encoded envelope.
//!
//! The plain form of a level is `{"contents": {...}, "metadata": ...}` where
//! files are `null` and directories are nested plain forms. `metadata` is
//! only present when set. The envelope wraps a plain tree as
//! `{"type": "Tree", "version": "1.0.0", "tree": ...}`.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::FormatError;
use crate::node::Node;
use crate::tree::Tree;

/// Type tag every envelope must carry.
pub const ENVELOPE_TYPE: &str = "Tree";

/// Envelope version written by [`encode`]. Decoding accepts any version.
pub const ENVELOPE_VERSION: &str = "1.0.0";

#[derive(Serialize)]
struct Envelope<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    version: &'a str,
    tree: &'a Tree,
}

impl<'a> Envelope<'a> {
    fn new(tree: &'a Tree) -> Self {
        Self {
            kind: ENVELOPE_TYPE,
            version: ENVELOPE_VERSION,
            tree,
        }
    }
}

/// Convert a tree into its plain JSON form.
pub fn to_plain(tree: &Tree) -> Value {
    let contents: Map<String, Value> = tree
        .iter()
        .map(|(name, node)| {
            let value = match node {
                Node::File => Value::Null,
                Node::Directory(subtree) => to_plain(subtree),
            };
            (name.to_string(), value)
        })
        .collect();

    let mut plain = Map::new();
    plain.insert("contents".to_string(), Value::Object(contents));
    if let Some(metadata) = tree.metadata() {
        plain.insert("metadata".to_string(), metadata.clone());
    }
    Value::Object(plain)
}

/// Rebuild a tree from its plain JSON form.
pub fn from_plain(value: Value) -> Result<Tree, FormatError> {
    serde_json::from_value(value).map_err(FormatError::Structure)
}

/// Encode a tree as compact envelope text.
pub fn encode(tree: &Tree) -> Result<String, FormatError> {
    serde_json::to_string(&Envelope::new(tree)).map_err(FormatError::Json)
}

/// Encode a tree as indented envelope text.
pub fn encode_pretty(tree: &Tree) -> Result<String, FormatError> {
    serde_json::to_string_pretty(&Envelope::new(tree)).map_err(FormatError::Json)
}

/// Decode envelope text produced by [`encode`] or [`encode_pretty`].
pub fn decode(text: &str) -> Result<Tree, FormatError> {
    let value: Value = serde_json::from_str(text).map_err(FormatError::Json)?;
    let Value::Object(mut envelope) = value else {
        return Err(FormatError::UnexpectedType { found: None });
    };

    match envelope.get("type") {
        Some(Value::String(kind)) if kind == ENVELOPE_TYPE => {}
        Some(Value::String(kind)) => {
            return Err(FormatError::UnexpectedType {
                found: Some(kind.clone()),
            });
        }
        Some(other) => {
            return Err(FormatError::UnexpectedType {
                found: Some(other.to_string()),
            });
        }
        None => return Err(FormatError::UnexpectedType { found: None }),
    }

    match envelope.get("version").and_then(Value::as_str) {
        Some(ENVELOPE_VERSION) => {}
        version => warn!(?version, expected = ENVELOPE_VERSION, "Decoding envelope with unexpected version"),
    }

    let tree = envelope
        .remove("tree")
        .ok_or(FormatError::MissingField { field: "tree" })?;
    from_plain(tree)
}
