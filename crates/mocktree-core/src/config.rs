//! Configuration for the mock tree server
//!
//! Callers hand in a [`TreeOptions`] bag (from a file, the CLI, or code) and
//! resolve it once into an immutable [`TreeConfig`]. Every component borrows
//! the resolved config; nothing mutates it afterwards.
//!
//! Option files use the historical option names:
//!
//! ```json
//! {
//!   "data": "./fileTree.json",
//!   "nodePath": "/node",
//!   "childrenPath": "/children",
//!   "idFieldName": "id",
//!   "childrenFieldName": "children",
//!   "includePath": true,
//!   "port": 3000
//! }
//! ```

use crate::error::{Result, TreeError};
use crate::source::DataSource;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_DATA_FILE: &str = "./fileTree.json";
pub const DEFAULT_NODE_PATH: &str = "/node";
pub const DEFAULT_CHILDREN_PATH: &str = "/children";
pub const DEFAULT_ID_FIELD: &str = "id";
pub const DEFAULT_CHILDREN_FIELD: &str = "children";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Caller-supplied options. Unset fields fall back to the defaults above.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeOptions {
    /// Path of a JSON file holding the tree
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,

    /// Literal tree; takes precedence over `data`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_object: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_field_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_field_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_path: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Acknowledge PUT requests on the element resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept_writes: Option<bool>,
}

impl TreeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The file-browser layout: `/file` and `/folder` over `title`/`items`
    pub fn legacy() -> Self {
        Self {
            data: Some(PathBuf::from(DEFAULT_DATA_FILE)),
            node_path: Some("/file".to_string()),
            children_path: Some("/folder".to_string()),
            id_field_name: Some("title".to_string()),
            children_field_name: Some("items".to_string()),
            accept_writes: Some(true),
            ..Self::default()
        }
    }

    /// Load options from a JSON or YAML file (chosen by extension)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| TreeError::io(path, e))?;

        let options: Self = if path
            .extension()
            .map(|e| e == "yaml" || e == "yml")
            .unwrap_or(false)
        {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        info!("Loaded options from {}", path.display());
        Ok(options)
    }

    /// Layer `overrides` on top of `self`; set fields in `overrides` win
    pub fn merge(self, overrides: TreeOptions) -> Self {
        Self {
            data: overrides.data.or(self.data),
            data_object: overrides.data_object.or(self.data_object),
            node_path: overrides.node_path.or(self.node_path),
            children_path: overrides.children_path.or(self.children_path),
            id_field_name: overrides.id_field_name.or(self.id_field_name),
            children_field_name: overrides.children_field_name.or(self.children_field_name),
            include_path: overrides.include_path.or(self.include_path),
            host: overrides.host.or(self.host),
            port: overrides.port.or(self.port),
            accept_writes: overrides.accept_writes.or(self.accept_writes),
        }
    }

    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data = Some(path.into());
        self
    }

    pub fn data_object(mut self, tree: Value) -> Self {
        self.data_object = Some(tree);
        self
    }

    pub fn node_path(mut self, prefix: impl Into<String>) -> Self {
        self.node_path = Some(prefix.into());
        self
    }

    pub fn children_path(mut self, prefix: impl Into<String>) -> Self {
        self.children_path = Some(prefix.into());
        self
    }

    pub fn id_field(mut self, name: impl Into<String>) -> Self {
        self.id_field_name = Some(name.into());
        self
    }

    pub fn children_field(mut self, name: impl Into<String>) -> Self {
        self.children_field_name = Some(name.into());
        self
    }

    pub fn include_path(mut self, enabled: bool) -> Self {
        self.include_path = Some(enabled);
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn accept_writes(mut self, enabled: bool) -> Self {
        self.accept_writes = Some(enabled);
        self
    }

    /// Merge over the defaults and validate into an immutable config
    pub fn resolve(self) -> Result<TreeConfig> {
        let source = match (self.data_object, self.data) {
            (Some(tree), _) => DataSource::in_memory(tree),
            (None, Some(path)) => DataSource::file(path),
            (None, None) => DataSource::file(DEFAULT_DATA_FILE),
        };

        let node_path = normalize_prefix(
            "nodePath",
            self.node_path.as_deref().unwrap_or(DEFAULT_NODE_PATH),
        )?;
        let children_path = normalize_prefix(
            "childrenPath",
            self.children_path.as_deref().unwrap_or(DEFAULT_CHILDREN_PATH),
        )?;
        if node_path == children_path {
            return Err(TreeError::config(format!(
                "nodePath and childrenPath must differ (both are {})",
                node_path
            )));
        }
        if is_nested(&node_path, &children_path) || is_nested(&children_path, &node_path) {
            return Err(TreeError::config(format!(
                "nodePath {} and childrenPath {} may not be nested",
                node_path, children_path
            )));
        }

        let id_field = field_name(
            "idFieldName",
            self.id_field_name.unwrap_or_else(|| DEFAULT_ID_FIELD.to_string()),
        )?;
        let children_field = field_name(
            "childrenFieldName",
            self.children_field_name
                .unwrap_or_else(|| DEFAULT_CHILDREN_FIELD.to_string()),
        )?;

        Ok(TreeConfig {
            source,
            node_path,
            children_path,
            id_field,
            children_field,
            include_path: self.include_path.unwrap_or(true),
            host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: self.port.unwrap_or(DEFAULT_PORT),
            accept_writes: self.accept_writes.unwrap_or(false),
        })
    }
}

/// Resolved, immutable configuration
#[derive(Debug, Clone)]
pub struct TreeConfig {
    pub source: DataSource,
    /// Route prefix for the element view, e.g. `/node`
    pub node_path: String,
    /// Route prefix for the collection view, e.g. `/children`
    pub children_path: String,
    pub id_field: String,
    pub children_field: String,
    pub include_path: bool,
    pub host: String,
    pub port: u16,
    pub accept_writes: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            source: DataSource::file(DEFAULT_DATA_FILE),
            node_path: DEFAULT_NODE_PATH.to_string(),
            children_path: DEFAULT_CHILDREN_PATH.to_string(),
            id_field: DEFAULT_ID_FIELD.to_string(),
            children_field: DEFAULT_CHILDREN_FIELD.to_string(),
            include_path: true,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            accept_writes: false,
        }
    }
}

impl TreeConfig {
    /// `host:port` as handed to the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn normalize_prefix(option: &str, raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(TreeError::config(format!(
            "{} must name a path below '/', got '{}'",
            option, raw
        )));
    }
    if trimmed.contains([':', '*', '{', '}']) {
        return Err(TreeError::config(format!(
            "{} may not contain ':', '*', '{{' or '}}', got '{}'",
            option, raw
        )));
    }

    if trimmed.starts_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("/{}", trimmed))
    }
}

fn is_nested(outer: &str, inner: &str) -> bool {
    inner
        .strip_prefix(outer)
        .is_some_and(|rest| rest.starts_with('/'))
}

fn field_name(option: &str, name: String) -> Result<String> {
    if name.is_empty() {
        return Err(TreeError::config(format!("{} may not be empty", option)));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = TreeOptions::new().resolve().unwrap();

        assert_eq!(config.node_path, "/node");
        assert_eq!(config.children_path, "/children");
        assert_eq!(config.id_field, "id");
        assert_eq!(config.children_field, "children");
        assert!(config.include_path);
        assert!(!config.accept_writes);
        assert_eq!(config.port, 3000);
        assert!(matches!(config.source, DataSource::File(_)));
    }

    #[test]
    fn test_data_object_wins_over_file() {
        let config = TreeOptions::new()
            .data_file("./tree.json")
            .data_object(json!({"root": true}))
            .resolve()
            .unwrap();

        assert!(matches!(config.source, DataSource::InMemory(_)));
    }

    #[test]
    fn test_prefix_normalization() {
        let config = TreeOptions::new()
            .node_path("myNode/")
            .children_path("/api/kids//")
            .resolve()
            .unwrap();

        assert_eq!(config.node_path, "/myNode");
        assert_eq!(config.children_path, "/api/kids");
    }

    #[test]
    fn test_invalid_prefixes() {
        assert!(TreeOptions::new().node_path("/").resolve().is_err());
        assert!(TreeOptions::new().node_path("").resolve().is_err());
        assert!(TreeOptions::new().node_path("/node/:id").resolve().is_err());
        assert!(TreeOptions::new()
            .node_path("/same")
            .children_path("/same/")
            .resolve()
            .is_err());
        assert!(TreeOptions::new()
            .node_path("/tree")
            .children_path("/tree/kids")
            .resolve()
            .is_err());
        assert!(TreeOptions::new()
            .node_path("/tree")
            .children_path("/treekids")
            .resolve()
            .is_ok());
    }

    #[test]
    fn test_empty_field_name_rejected() {
        let err = TreeOptions::new().id_field("").resolve().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_merge_overrides_win() {
        let base = TreeOptions::legacy().port(4000);
        let merged = base.merge(TreeOptions::new().port(5000).include_path(false));

        assert_eq!(merged.port, Some(5000));
        assert_eq!(merged.include_path, Some(false));
        assert_eq!(merged.id_field_name.as_deref(), Some("title"));
    }

    #[test]
    fn test_legacy_preset() {
        let config = TreeOptions::legacy().resolve().unwrap();

        assert_eq!(config.node_path, "/file");
        assert_eq!(config.children_path, "/folder");
        assert_eq!(config.id_field, "title");
        assert_eq!(config.children_field, "items");
        assert!(config.accept_writes);
    }

    #[test]
    fn test_load_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("options.json");
        std::fs::write(
            &json_path,
            r#"{"idFieldName": "name", "includePath": false, "dataObject": {"children": []}}"#,
        )
        .unwrap();
        let options = TreeOptions::load(&json_path).unwrap();
        assert_eq!(options.id_field_name.as_deref(), Some("name"));
        assert_eq!(options.include_path, Some(false));
        assert_eq!(options.data_object, Some(json!({"children": []})));

        let yaml_path = dir.path().join("options.yaml");
        std::fs::write(&yaml_path, "childrenPath: /kids\nport: 8081\n").unwrap();
        let options = TreeOptions::load(&yaml_path).unwrap();
        assert_eq!(options.children_path.as_deref(), Some("/kids"));
        assert_eq!(options.port, Some(8081));
    }

    #[test]
    fn test_load_missing_file() {
        let err = TreeOptions::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, TreeError::Io { .. }));
    }
}
