//! Manimator CLI - describe an animation, get a rendered video
//!
//! The client side of the pipeline:
//!
//! 1. [`client::ToolHost`] launches the MCP tool host and discovers its tools
//! 2. the tools are bridged into model function declarations
//! 3. [`orchestrator::Orchestrator`] asks the model ([`gemini::GeminiModel`])
//!    for scene code and sends it to `execute_manim_code`
//! 4. [`repl::Repl`] repeats that for every description typed in

pub mod client;
pub mod config;
pub mod gemini;
pub mod orchestrator;
pub mod repl;

pub use client::ToolHost;
pub use config::{Cli, Config, ServerCommand};
pub use gemini::GeminiModel;
pub use orchestrator::{LanguageModel, ModelReply, Orchestrator, SceneExecutor};
pub use repl::Repl;
