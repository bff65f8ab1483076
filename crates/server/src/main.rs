//! `mcp-sdamgia`: serves the sdamgia tools over MCP on stdin/stdout.
//!
//! stdout carries JSON-RPC only; logs are JSON lines on stderr, filtered by
//! `RUST_LOG`.

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use sdamgia_client::SdamClient;
use sdamgia_core::AppConfig;
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

    let config = AppConfig::load()?;
    tracing::info!(
        timeout_ms = config.timeout_ms,
        retries = config.retries,
        "serving sdamgia tools on stdio"
    );

    let handler = handler::SdamgiaServer::new(SdamClient::new(&config)?);
    let running = serve_server(handler, stdio()).await?;
    let reason = running.waiting().await?;
    tracing::info!(?reason, "mcp-sdamgia stopped");

    Ok(())
}
