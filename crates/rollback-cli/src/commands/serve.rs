//! `rollback serve`: run the MCP server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use rollback_client::CircleCiClient;
use rollback_core::{RollbackConfig, Transport};
use rollback_mcp::McpServer;

/// Arguments for `rollback serve`.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Configuration file path.
    #[arg(short, long, default_value = "rollback.yaml")]
    pub config: PathBuf,

    /// Override the configured transport (stdio or http).
    #[arg(long)]
    pub transport: Option<String>,

    /// Override the configured HTTP port.
    #[arg(long)]
    pub port: Option<u16>,
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = RollbackConfig::load_or_default(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;

    if let Some(transport) = &args.transport {
        config.mcp.transport = match transport.as_str() {
            "stdio" => Transport::Stdio,
            "http" => Transport::Http,
            other => anyhow::bail!("unknown transport: {} (expected stdio or http)", other),
        };
    }
    if let Some(port) = args.port {
        config.mcp.port = port;
    }

    let token = config.api.resolve_token()?;
    let client = CircleCiClient::new(&config.api, config.retry.clone(), &token)
        .context("failed to build CircleCI client")?;

    info!(
        base_url = %config.api.base_url,
        transport = ?config.mcp.transport,
        "starting rollback MCP server"
    );

    let server = McpServer::new(config.mcp.clone(), Arc::new(client));
    let shutdown = server.shutdown_token();

    tokio::select! {
        result = server.run() => result.map_err(Into::into),
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, shutting down");
            shutdown.cancel();
            Ok(())
        }
    }
}
