//! Manimator MCP Server Binary
//!
//! Runs the Manimator tool host on stdio transport. The `manimator` client
//! launches it automatically; it can also be registered with any MCP client:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "manimator": {
//!       "command": "manimator-mcp",
//!       "args": ["--quality", "medium"]
//!     }
//!   }
//! }
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use manimator_engine::{ManimCli, Quality, RenderConfig, Renderer, SceneRunner, Workspace};
use rmcp::ServiceExt;
use rmcp::transport::io::stdio;
use tracing::info;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use manimator_mcp::ManimMcpService;
use manimator_mcp::state::RunnerHandle;

#[derive(Parser)]
#[command(name = "manimator-mcp")]
#[command(about = "MCP tool host that renders Manim scenes", long_about = None)]
#[command(version)]
struct Args {
    /// Workspace directory (wiped on every execution)
    #[arg(long, env = "MANIMATOR_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Python interpreter with manim installed
    #[arg(long, env = "MANIMATOR_PYTHON", default_value = "python3")]
    python: PathBuf,

    /// Render quality: low, medium, high, production, fourk
    #[arg(long, default_value = "low")]
    quality: Quality,

    /// Renderer backend: cairo, opengl
    #[arg(long, default_value = "cairo")]
    renderer: Renderer,
}

#[tokio::main]
async fn main() -> Result<()> {
    // CRITICAL: Log to stderr only - stdout is reserved for MCP JSON-RPC
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let workspace = match args.workspace {
        Some(root) => Workspace::new(root),
        None => Workspace::beside_executable()?,
    };

    let template = RenderConfig::new(workspace.root())
        .with_quality(args.quality)
        .with_renderer(args.renderer);

    info!("Manimator MCP server v{}", env!("CARGO_PKG_VERSION"));
    info!("Workspace: {}", workspace.root().display());

    let runner = SceneRunner::new(workspace, ManimCli::new(args.python), template);
    let service = ManimMcpService::new(RunnerHandle::spawn(runner));

    info!("Ready. Listening on stdio...");
    let server = service.serve(stdio()).await?;

    // Wait for client to disconnect or error
    server.waiting().await?;

    info!("Client disconnected. Shutting down.");
    Ok(())
}
