//! Manimator - natural language to Manim animations

use anyhow::{Context, Result};
use clap::Parser;
use manimator_cli::{Cli, Config, GeminiModel, Orchestrator, Repl, ToolHost};
use manimator_core::schema::to_function_declarations;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so the prompt on stdout stays readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env(&cli)?;

    println!("Manimator - Natural Language to Manim Animations");
    println!("{}", "=".repeat(60));

    let host = ToolHost::connect(&config.server)
        .await
        .context("Failed to connect to server")?;
    println!("Connected! Tools: {:?}", host.tool_names());

    let declarations = to_function_declarations(host.tools());
    let model = GeminiModel::from_config(&config)?;
    let mut repl = Repl::new(Orchestrator::new(model, host, declarations))?;

    let result = repl.run().await;

    let (_, host) = repl.into_orchestrator().into_parts();
    host.shutdown().await?;

    result
}
