//! Client configuration
//!
//! Command-line options plus the model credential from the environment.
//! A missing credential stops the process before anything is launched.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::Parser;
use manimator_core::{Error, Result};

use crate::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL};

/// Environment variable holding the model credential
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Name of the tool host binary looked up next to the client
const SERVER_BINARY: &str = "manimator-mcp";

#[derive(Parser, Debug)]
#[command(name = "manimator")]
#[command(about = "Describe an animation, get a rendered Manim video", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Tool host to launch (.py runs with python, .js with node); defaults to manimator-mcp next to this binary
    #[arg(long)]
    pub server: Option<PathBuf>,

    /// Model identifier
    #[arg(long, env = "MANIMATOR_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the Gemini API
    #[arg(long, env = "GEMINI_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,
}

/// How to start the tool host process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl ServerCommand {
    /// Pick an interpreter from the script extension, or run the path directly
    pub fn for_path(path: &Path) -> Self {
        let interpreter = match path.extension().and_then(|e| e.to_str()) {
            Some("py") => Some("python"),
            Some("js" | "mjs") => Some("node"),
            _ => None,
        };

        match interpreter {
            Some(program) => Self {
                program: PathBuf::from(program),
                args: vec![path.as_os_str().to_owned()],
            },
            None => Self {
                program: path.to_path_buf(),
                args: Vec::new(),
            },
        }
    }

    /// The `manimator-mcp` binary installed alongside the running executable
    pub fn beside_executable() -> Result<Self> {
        let exe = std::env::current_exe()?;
        let dir = exe
            .parent()
            .ok_or_else(|| Error::Config(format!("{} has no parent directory", exe.display())))?;
        let binary = dir.join(format!("{SERVER_BINARY}{}", std::env::consts::EXE_SUFFIX));
        Ok(Self::for_path(&binary))
    }

    /// Build the process command
    pub fn to_command(&self) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl std::fmt::Display for ServerCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Resolved client configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub server: ServerCommand,
}

impl Config {
    /// Resolve from parsed options and the process environment
    pub fn from_env(cli: &Cli) -> Result<Self> {
        Self::resolve(cli, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup
    pub fn resolve(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = env(API_KEY_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| Error::Config(format!("{API_KEY_VAR} not found.")))?;

        let model = cli.model.trim();
        if model.is_empty() {
            return Err(Error::Config("model cannot be empty".to_string()));
        }

        let server = match &cli.server {
            Some(path) => ServerCommand::for_path(path),
            None => ServerCommand::beside_executable()?,
        };

        Ok(Self {
            api_key,
            model: model.to_string(),
            api_base: cli.api_base.trim().to_string(),
            server,
        })
    }
}
