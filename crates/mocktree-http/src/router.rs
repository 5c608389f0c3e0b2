//! Router Composition
//!
//! Mounts the element and collection resources at the prefixes named in the
//! tree config. Each resource answers both at its bare prefix (the root node)
//! and below it.

use crate::handlers;
use crate::middleware::{apply_middleware, MiddlewareConfig};
use crate::{Result, ServerError};
use axum::routing::{get, MethodRouter};
use axum::Router;
use mocktree_core::{TreeService, ViewMode};
use std::sync::Arc;
use tracing::info;

/// Liveness route, mounted unless disabled
pub const HEALTH_PATH: &str = "/_health";

/// Builder for the tree router
pub struct RouterBuilder {
    service: Arc<TreeService>,
    health: bool,
    middleware: Option<MiddlewareConfig>,
}

impl RouterBuilder {
    /// Create a new router builder over a loaded tree
    pub fn new(service: Arc<TreeService>) -> Self {
        Self {
            service,
            health: true,
            middleware: None,
        }
    }

    /// Enable/disable the health route
    pub fn health(mut self, enabled: bool) -> Self {
        self.health = enabled;
        self
    }

    /// Wrap the routes in a middleware stack
    pub fn middleware(mut self, config: MiddlewareConfig) -> Self {
        self.middleware = Some(config);
        self
    }

    /// Build the final router
    pub fn build(self) -> Result<Router> {
        let service = Arc::clone(&self.service);
        let node_path = service.prefix(ViewMode::Element).to_string();
        let children_path = service.prefix(ViewMode::Collection).to_string();

        if self.health && (node_path == HEALTH_PATH || children_path == HEALTH_PATH) {
            return Err(ServerError::Router(format!(
                "{} is reserved for the health route",
                HEALTH_PATH
            )));
        }

        let mut element = get(handlers::get_node);
        if service.config().accept_writes {
            element = element.put(handlers::put_node);
        }

        let router = mount(Router::new(), &node_path, "element view", element);
        let mut router = mount(
            router,
            &children_path,
            "collection view",
            get(handlers::get_children),
        );

        if self.health {
            router = router.route(HEALTH_PATH, get(handlers::health));
        }

        let router = router.with_state(service);

        Ok(match self.middleware {
            Some(config) => apply_middleware(router, config),
            None => router,
        })
    }
}

/// Tree router with the default middleware stack
pub fn create_router(service: Arc<TreeService>) -> Result<Router> {
    RouterBuilder::new(service)
        .middleware(MiddlewareConfig::default())
        .build()
}

/// Mount `method_router` at `prefix` and everything below it
///
/// `/*rest` only matches a non-empty tail, so the bare `{prefix}/` is
/// routed separately.
fn mount(
    router: Router<Arc<TreeService>>,
    prefix: &str,
    name: &str,
    method_router: MethodRouter<Arc<TreeService>>,
) -> Router<Arc<TreeService>> {
    info!("Mounting {} at {}", name, prefix);
    router
        .route(prefix, method_router.clone())
        .route(&format!("{}/", prefix), method_router.clone())
        .route(&format!("{}/*rest", prefix), method_router)
}
