use anyhow::Context;
use cbridge_core::{ClaudeCli, Defaults};
use cbridge_http::{start_server, ServerConfig};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// HTTP bridge running one Claude Code conversation per request.
///
/// Backend options (permission mode, tools, model, max turns, cwd, extra
/// args) are read from the CLAUDE_* environment on every request.
#[derive(Parser, Debug)]
#[command(name = "cbridge", version, about)]
struct Cli {
    /// Address to bind
    #[arg(long, env = "CLAUDE_BRIDGE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind
    #[arg(short, long, env = "CLAUDE_BRIDGE_PORT", default_value_t = 8888)]
    port: u16,

    /// MCP manifest used when CLAUDE_MCP_CONFIG_PATH is unset at request time
    #[arg(long, env = "CLAUDE_MCP_CONFIG_PATH")]
    mcp_config: Option<PathBuf>,

    /// Claude Code CLI executable (default: search PATH and common install dirs)
    #[arg(long, env = "CLAUDE_CLI_PATH")]
    claude_cli: Option<PathBuf>,

    /// Log filter when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let defaults = Defaults {
        host: cli.host,
        port: cli.port,
        mcp_config: cli.mcp_config,
    };
    let backend = match cli.claude_cli {
        Some(path) => ClaudeCli::with_path(path),
        None => ClaudeCli::new(),
    };
    match backend.locate() {
        Ok(path) => tracing::info!("Using Claude Code CLI at {}", path.display()),
        Err(e) => tracing::warn!("{}; /chat requests will fail", e),
    }

    let config = ServerConfig::new(defaults).with_backend(Arc::new(backend));
    start_server(config).await
}
