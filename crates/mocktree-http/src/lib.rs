//! mocktree-http: HTTP gateway for the mock tree server
//!
//! Binds the two tree resources to [`mocktree_core::TreeService`] and owns
//! the listen/close lifecycle.
//!
//! ```text
//! HttpServer
//!     ├── Middleware stack (CORS, tracing, timeout, request logging)
//!     └── Tree router
//!         ├── GET {nodePath}[/*]      → element view
//!         ├── GET {childrenPath}[/*]  → collection view
//!         ├── PUT {nodePath}[/*]      → "ok" (when writes are accepted)
//!         └── GET /_health            → liveness
//! ```

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

// Re-export main types
pub use handlers::ApiError;
pub use middleware::{CorsPolicy, MiddlewareConfig};
pub use router::{create_router, RouterBuilder, HEALTH_PATH};
pub use server::{start, HttpServer, HttpServerBuilder, ServerConfig, ServerHandle};

pub use axum;

use mocktree_core::TreeError;

/// Error types for the HTTP server
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Server binding error: {0}")]
    Bind(#[from] std::io::Error),

    #[error("Tree configuration error: {0}")]
    Config(#[from] TreeError),

    #[error("Router configuration error: {0}")]
    Router(String),

    #[error("Server task failed: {0}")]
    Serve(String),
}

pub type Result<T> = std::result::Result<T, ServerError>;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::middleware::{CorsPolicy, MiddlewareConfig};
    pub use super::router::{create_router, RouterBuilder};
    pub use super::server::{start, HttpServer, HttpServerBuilder, ServerConfig, ServerHandle};
    pub use super::{Result, ServerError};
}
