//! Data sources for the tree snapshot
//!
//! A source is read exactly once, before the server accepts connections.
//! The resulting [`Snapshot`] is shared read-only for the process lifetime.

use crate::error::{Result, TreeError};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Anything that can produce the root snapshot
pub trait TreeSource {
    /// Load and normalize the root node
    fn load_snapshot(&self, children_field: &str) -> Result<Snapshot>;

    /// Short description for logging
    fn describe(&self) -> String;
}

/// Tree read from a JSON file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TreeSource for FileSource {
    fn load_snapshot(&self, children_field: &str) -> Result<Snapshot> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| TreeError::io(&self.path, e))?;
        let value: Value = serde_json::from_str(&content).map_err(|e| {
            TreeError::config(format!(
                "Failed to parse tree data in {}: {}",
                self.path.display(),
                e
            ))
        })?;
        debug!("Read {} bytes from {}", content.len(), self.path.display());
        Snapshot::from_value(value, children_field)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Tree passed in directly as a literal value
#[derive(Debug, Clone)]
pub struct InMemorySource {
    tree: Value,
}

impl InMemorySource {
    pub fn new(tree: Value) -> Self {
        Self { tree }
    }
}

impl TreeSource for InMemorySource {
    fn load_snapshot(&self, children_field: &str) -> Result<Snapshot> {
        Snapshot::from_value(self.tree.clone(), children_field)
    }

    fn describe(&self) -> String {
        "in-memory object".to_string()
    }
}

/// The closed set of supported sources, chosen when options are resolved
#[derive(Debug, Clone)]
pub enum DataSource {
    File(FileSource),
    InMemory(InMemorySource),
}

impl DataSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        DataSource::File(FileSource::new(path))
    }

    pub fn in_memory(tree: Value) -> Self {
        DataSource::InMemory(InMemorySource::new(tree))
    }

    /// Load the snapshot and log what was loaded
    pub fn load(&self, children_field: &str) -> Result<Snapshot> {
        let snapshot = self.load_snapshot(children_field)?;
        info!(
            "Loaded tree from {} ({} top-level children)",
            self.describe(),
            snapshot.child_count(children_field)
        );
        Ok(snapshot)
    }
}

impl TreeSource for DataSource {
    fn load_snapshot(&self, children_field: &str) -> Result<Snapshot> {
        match self {
            DataSource::File(source) => source.load_snapshot(children_field),
            DataSource::InMemory(source) => source.load_snapshot(children_field),
        }
    }

    fn describe(&self) -> String {
        match self {
            DataSource::File(source) => source.describe(),
            DataSource::InMemory(source) => source.describe(),
        }
    }
}

/// Immutable root of the tree, cheap to clone across tasks
#[derive(Debug, Clone)]
pub struct Snapshot {
    root: Arc<Value>,
}

impl Snapshot {
    /// An object is the root itself; an array is the root's children list
    pub fn from_value(value: Value, children_field: &str) -> Result<Self> {
        let root = match value {
            Value::Object(_) => value,
            Value::Array(children) => {
                let mut root = Map::new();
                root.insert(children_field.to_string(), Value::Array(children));
                Value::Object(root)
            }
            other => {
                return Err(TreeError::config(format!(
                    "Tree root must be an object or an array, got {}",
                    json_kind(&other)
                )))
            }
        };

        Ok(Self {
            root: Arc::new(root),
        })
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn child_count(&self, children_field: &str) -> usize {
        self.root
            .get(children_field)
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
