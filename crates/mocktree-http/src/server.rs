//! HTTP Server Lifecycle
//!
//! `start` binds and serves in a background task, handing back a
//! [`ServerHandle`] that closes the listener. `serve_until` runs in the
//! foreground until a shutdown signal resolves.

use crate::middleware::MiddlewareConfig;
use crate::router::RouterBuilder;
use crate::{Result, ServerError};
use axum::Router;
use mocktree_core::{TreeConfig, TreeService};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Bind host
    pub bind_host: String,
    /// HTTP port (0 picks an ephemeral port)
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_host: mocktree_core::config::DEFAULT_HOST.to_string(),
            http_port: mocktree_core::config::DEFAULT_PORT,
        }
    }
}

/// Mock tree HTTP server
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new server builder
    pub fn builder() -> HttpServerBuilder {
        HttpServerBuilder::new()
    }

    async fn bind(&self) -> Result<TcpListener> {
        let listener = TcpListener::bind((self.config.bind_host.as_str(), self.config.http_port))
            .await
            .map_err(ServerError::Bind)?;
        info!(
            "Mock tree server is listening at http://{}",
            listener.local_addr()?
        );
        Ok(listener)
    }

    /// Bind and serve in the background. Dropping the handle also stops the server.
    pub async fn start(self) -> Result<ServerHandle> {
        let listener = self.bind().await?;
        let local_addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            axum::serve(listener, self.router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        Ok(ServerHandle {
            local_addr,
            shutdown: Some(shutdown_tx),
            task,
        })
    }

    /// Bind and serve until `signal` resolves
    pub async fn serve_until<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;

        axum::serve(listener, self.router)
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        info!("Mock tree server stopped");
        Ok(())
    }
}

/// Handle to a server started with [`HttpServer::start`]
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<std::io::Result<()>>,
}

impl ServerHandle {
    /// Address the listener is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// `http://host:port` for the bound listener
    pub fn url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    /// Stop accepting, finish in-flight requests and release the port
    pub async fn close(mut self) -> Result<()> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        (&mut self.task)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        info!("Mock tree server at {} closed", self.local_addr);
        Ok(())
    }
}

/// Builder for HttpServer
pub struct HttpServerBuilder {
    bind_host: String,
    http_port: u16,
    router: Option<Router>,
}

impl HttpServerBuilder {
    pub fn new() -> Self {
        let defaults = ServerConfig::default();
        Self {
            bind_host: defaults.bind_host,
            http_port: defaults.http_port,
            router: None,
        }
    }

    /// Take host and port from a tree config
    pub fn tree_config(mut self, config: &TreeConfig) -> Self {
        self.bind_host = config.host.clone();
        self.http_port = config.port;
        self
    }

    /// Set the router
    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    /// Build the server
    pub fn build(self) -> Result<HttpServer> {
        let router = self.router.ok_or_else(|| {
            ServerError::Router("No router configured for the server".to_string())
        })?;

        let config = ServerConfig {
            bind_host: self.bind_host,
            http_port: self.http_port,
        };

        Ok(HttpServer { config, router })
    }
}

impl Default for HttpServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Load the tree, build the router and start serving on the configured port
pub async fn start(config: TreeConfig, middleware: MiddlewareConfig) -> Result<ServerHandle> {
    let service = Arc::new(TreeService::from_config(config)?);
    let router = RouterBuilder::new(Arc::clone(&service))
        .middleware(middleware)
        .build()?;

    HttpServer::builder()
        .tree_config(service.config())
        .router(router)
        .build()?
        .start()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use mocktree_core::TreeOptions;

    #[test]
    fn test_builder_requires_router() {
        let result = HttpServer::builder().build();
        assert!(matches!(result, Err(ServerError::Router(_))));
    }

    #[test]
    fn test_builder_takes_host_and_port_from_tree_config() {
        let config = TreeOptions::new()
            .host("127.0.0.1")
            .port(4321)
            .data_object(serde_json::json!({}))
            .resolve()
            .unwrap();

        let server = HttpServer::builder()
            .tree_config(&config)
            .router(Router::new())
            .build()
            .unwrap();

        assert_eq!(server.config.bind_host, "127.0.0.1");
        assert_eq!(server.config.http_port, 4321);
    }
}
