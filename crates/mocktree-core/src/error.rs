//! Error types for mocktree-core

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tree loading and resolution
#[derive(Error, Debug)]
pub enum TreeError {
    /// A request path does not lead to any node
    #[error("Not found: no node at {path} (unmatched segment '{segment}')")]
    NotFound { path: String, segment: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, TreeError>;

impl TreeError {
    /// Create a not found error
    pub fn not_found(path: impl Into<String>, segment: impl Into<String>) -> Self {
        TreeError::NotFound {
            path: path.into(),
            segment: segment.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        TreeError::Config(msg.into())
    }

    /// Create an IO error bound to the file it came from
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TreeError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TreeError::NotFound { .. })
    }

    /// Everything except NotFound happens at startup and is fatal there
    pub fn is_config(&self) -> bool {
        !self.is_not_found()
    }
}
