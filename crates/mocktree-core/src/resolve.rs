//! Node resolution
//!
//! Walks the snapshot from the root, matching each path segment against the
//! identifier field of the current node's children. The first matching
//! sibling wins. Identifier comparison is always textual: a numeric `1`
//! (or `1.0`) is addressed by the segment `"1"`.

use crate::config::TreeConfig;
use crate::error::{Result, TreeError};
use crate::path::TreePath;
use crate::source::Snapshot;
use serde_json::{Number, Value};
use std::borrow::Cow;

/// Textual form of an identifier value, if it can address a node at all
pub fn identifier_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(number_text(n))),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Integral floats drop their fraction, the way JavaScript prints them
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => (f as i128).to_string(),
        _ => n.to_string(),
    }
}

/// Read-only view over the snapshot that locates nodes by path
pub struct NodeResolver<'a> {
    config: &'a TreeConfig,
    snapshot: &'a Snapshot,
}

impl<'a> NodeResolver<'a> {
    pub fn new(config: &'a TreeConfig, snapshot: &'a Snapshot) -> Self {
        Self { config, snapshot }
    }

    /// Borrow the node at `path` inside the shared snapshot
    pub fn locate(&self, path: &TreePath) -> Result<&'a Value> {
        let mut cursor = self.snapshot.root();

        for segment in path.segments() {
            cursor = self
                .find_child(cursor, segment)
                .ok_or_else(|| TreeError::not_found(path.to_string(), segment.as_str()))?;
        }

        Ok(cursor)
    }

    /// Deep, independent copy of the node at `path`
    pub fn resolve(&self, path: &TreePath) -> Result<Value> {
        self.locate(path).map(Value::clone)
    }

    fn find_child(&self, node: &'a Value, segment: &str) -> Option<&'a Value> {
        node.get(&self.config.children_field)?
            .as_array()?
            .iter()
            .find(|child| {
                child
                    .get(&self.config.id_field)
                    .and_then(identifier_text)
                    .is_some_and(|id| id == segment)
            })
    }
}
