//! cindex server entry point.
//!
//! Loads configuration, opens the cache index, and serves it over MCP on
//! stdio. Logging goes to stderr to avoid interfering with the JSON-RPC
//! protocol on stdout.

use anyhow::{Context, Result};
use cindex_core::{AppConfig, Backend, CacheIndex};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    let index = CacheIndex::open(Backend::new(config.backend), config.storage_dir())
        .await
        .with_context(|| format!("opening {} index at {}", config.backend, config.index_dir.display()))?;

    tracing::info!(backend = %config.backend, index_dir = ?index.index_dir(), "Starting cindex server on stdio transport");

    let handler = handler::IndexServer::new(index);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
