//! Request handlers for the tree resources

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use mocktree_core::{TreeError, TreeService, ViewMode};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// A core error on its way to the client
#[derive(Debug)]
pub struct ApiError(pub TreeError);

impl From<TreeError> for ApiError {
    fn from(err: TreeError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.0.to_string();
        let (status, body) = match self.0 {
            TreeError::NotFound { path, .. } => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: "not_found",
                    message,
                    path: Some(path),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "internal",
                    message,
                    path: None,
                },
            ),
        };

        tracing::warn!("{}", body.message);
        (status, Json(body)).into_response()
    }
}

fn render(service: &TreeService, mode: ViewMode, uri: &Uri) -> Result<Json<Value>, ApiError> {
    Ok(Json(service.view(mode, uri.path())?))
}

/// GET {nodePath}[/...] - single node without children
pub async fn get_node(
    State(service): State<Arc<TreeService>>,
    uri: Uri,
) -> Result<Json<Value>, ApiError> {
    render(&service, ViewMode::Element, &uri)
}

/// GET {childrenPath}[/...] - node with its immediate children
pub async fn get_children(
    State(service): State<Arc<TreeService>>,
    uri: Uri,
) -> Result<Json<Value>, ApiError> {
    render(&service, ViewMode::Collection, &uri)
}

/// PUT {nodePath}[/...] - accepted and ignored
pub async fn put_node(uri: Uri) -> &'static str {
    tracing::debug!("Ignoring write to {}", uri.path());
    "ok"
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET /_health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
