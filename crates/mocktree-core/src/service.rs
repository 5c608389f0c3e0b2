//! Tree service facade
//!
//! Ties parsing, resolution and projection together over one immutable
//! snapshot. Each call is a pure function of (snapshot, path, config).

use crate::config::TreeConfig;
use crate::error::Result;
use crate::path::TreePath;
use crate::resolve::NodeResolver;
use crate::source::Snapshot;
use crate::view::{ViewMode, ViewProjector};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TreeService {
    config: Arc<TreeConfig>,
    snapshot: Snapshot,
}

impl TreeService {
    pub fn new(config: Arc<TreeConfig>, snapshot: Snapshot) -> Self {
        Self { config, snapshot }
    }

    /// Load the configured data source once and wrap it
    pub fn from_config(config: TreeConfig) -> Result<Self> {
        let snapshot = config.source.load(&config.children_field)?;
        Ok(Self::new(Arc::new(config), snapshot))
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Route prefix a view is served under
    pub fn prefix(&self, mode: ViewMode) -> &str {
        match mode {
            ViewMode::Element => &self.config.node_path,
            ViewMode::Collection => &self.config.children_path,
        }
    }

    /// Element view for a raw request path under the node prefix
    pub fn element(&self, raw_path: &str) -> Result<Value> {
        self.view(ViewMode::Element, raw_path)
    }

    /// Collection view for a raw request path under the children prefix
    pub fn collection(&self, raw_path: &str) -> Result<Value> {
        self.view(ViewMode::Collection, raw_path)
    }

    pub fn view(&self, mode: ViewMode, raw_path: &str) -> Result<Value> {
        let path = TreePath::parse(raw_path, self.prefix(mode));
        self.view_path(mode, &path)
    }

    /// Resolve an already-parsed path and project it
    pub fn view_path(&self, mode: ViewMode, path: &TreePath) -> Result<Value> {
        let node = NodeResolver::new(&self.config, &self.snapshot).resolve(path)?;
        debug!("Resolved {} view at {}", mode.as_str(), path);
        Ok(ViewProjector::new(&self.config).project(mode, node, path))
    }
}
