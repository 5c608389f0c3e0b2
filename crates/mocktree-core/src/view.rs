//! View projection
//!
//! Shapes a resolved node into a response payload. Both views own the node
//! they are given, so stripping fields never touches the shared snapshot.

use crate::config::TreeConfig;
use crate::path::TreePath;
use crate::resolve::identifier_text;
use serde_json::Value;

/// Field that carries the reconstructed path in responses
pub const PATH_FIELD: &str = "path";

/// Which shape a resource returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// The node alone, without children
    Element,
    /// The node plus its immediate children, each without children
    Collection,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Element => "element",
            ViewMode::Collection => "collection",
        }
    }
}

pub struct ViewProjector<'a> {
    config: &'a TreeConfig,
}

impl<'a> ViewProjector<'a> {
    pub fn new(config: &'a TreeConfig) -> Self {
        Self { config }
    }

    pub fn project(&self, mode: ViewMode, node: Value, path: &TreePath) -> Value {
        match mode {
            ViewMode::Element => self.element(node, path),
            ViewMode::Collection => self.collection(node, path),
        }
    }

    pub fn element(&self, mut node: Value, path: &TreePath) -> Value {
        if let Some(fields) = node.as_object_mut() {
            fields.shift_remove(&self.config.children_field);
        }
        self.attach_path(&mut node, path);
        node
    }

    pub fn collection(&self, mut node: Value, path: &TreePath) -> Value {
        let children = match node
            .as_object_mut()
            .and_then(|fields| fields.shift_remove(&self.config.children_field))
        {
            Some(Value::Array(children)) => children,
            _ => Vec::new(),
        };

        let children: Vec<Value> = children
            .into_iter()
            .map(|child| self.prune_child(child, path))
            .collect();

        self.attach_path(&mut node, path);
        if let Some(fields) = node.as_object_mut() {
            fields.insert(self.config.children_field.clone(), Value::Array(children));
        }
        node
    }

    fn prune_child(&self, mut child: Value, parent: &TreePath) -> Value {
        let Some(fields) = child.as_object_mut() else {
            return child;
        };
        fields.shift_remove(&self.config.children_field);

        if self.config.include_path {
            // Children without a usable identifier cannot be addressed
            let child_path = fields
                .get(&self.config.id_field)
                .and_then(identifier_text)
                .map(|id| parent.child(id.into_owned()));
            if let Some(child_path) = child_path {
                fields.insert(PATH_FIELD.to_string(), Value::String(child_path.to_string()));
            }
        }
        child
    }

    fn attach_path(&self, node: &mut Value, path: &TreePath) {
        if !self.config.include_path {
            return;
        }
        if let Some(fields) = node.as_object_mut() {
            fields.insert(PATH_FIELD.to_string(), Value::String(path.to_string()));
        }
    }
}
