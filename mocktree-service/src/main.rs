//! mocktree: mock HTTP server for tree-shaped APIs
//!
//! Loads one JSON tree at startup and serves it read-only:
//! - GET /node/<id>/...      node without children
//! - GET /children/<id>/...  node with its immediate children
//!
//! Prefixes, field names and the data source are configurable through an
//! options file, `MOCKTREE_*` environment variables or flags.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use mocktree_core::TreeService;
use mocktree_http::prelude::*;

mod args;

use args::Args;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("mocktree_service=info".parse()?)
        .add_directive("mocktree_http=info".parse()?)
        .add_directive("mocktree_core=info".parse()?)
        .add_directive("tower_http=debug".parse()?);
    if args.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // --- 1. Resolve configuration ---
    let config = args
        .options()
        .context("Failed to load options")?
        .resolve()
        .context("Invalid configuration")?;

    // --- 2. Load the snapshot (fatal before binding) ---
    let service = Arc::new(TreeService::from_config(config).context("Failed to load tree data")?);

    // --- 3. Serve ---
    let middleware = MiddlewareConfig::new().cors(args.cors_policy()?);
    let router = RouterBuilder::new(Arc::clone(&service))
        .middleware(middleware)
        .build()?;

    let server = HttpServer::builder()
        .tree_config(service.config())
        .router(router)
        .build()?;

    info!(
        "Serving element view at {} and collection view at {}",
        service.config().node_path,
        service.config().children_path
    );
    server.serve_until(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received ctrl-c, shutting down"),
        Err(e) => {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await
        }
    }
}
