//! Rendering engine backends
//!
//! The runner only needs two things from the engine: load a script file and
//! resolve one class in it, then render that class under a given config.
//! [`ManimCli`] does both by driving a Python interpreter with manim installed.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use manimator_core::config::{RenderConfig, Renderer};
use manimator_core::{Error, Result};
use tracing::{debug, info};

/// Imports the script as a module and resolves the class name.
/// Exits non-zero with the exception on stderr if either step fails.
const LOAD_CHECK: &str = "\
import importlib.util, sys
spec = importlib.util.spec_from_file_location('scene_mod', sys.argv[1])
module = importlib.util.module_from_spec(spec)
spec.loader.exec_module(module)
getattr(module, sys.argv[2])
";

/// A script whose scene class resolved successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedScene {
    /// Persisted script path
    pub script: PathBuf,
    /// Scene subclass to render
    pub class_name: String,
}

/// Loads and renders scene scripts
///
/// Both calls block until the engine is done.
pub trait SceneBackend: Send {
    /// Load `script` and resolve `class_name` inside it
    fn load(&self, script: &Path, class_name: &str) -> Result<LoadedScene>;

    /// Render a loaded scene with exactly the given configuration
    fn render(&self, scene: &LoadedScene, config: &RenderConfig) -> Result<()>;
}

/// Backend that runs `python -m manim`
#[derive(Debug, Clone)]
pub struct ManimCli {
    python: PathBuf,
}

impl ManimCli {
    /// Use the given Python interpreter
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
        }
    }

    /// Interpreter used for both load and render
    pub fn python(&self) -> &Path {
        &self.python
    }

    fn run(&self, args: &[OsString]) -> std::io::Result<Output> {
        debug!("{} {:?}", self.python.display(), args);
        Command::new(&self.python).args(args).output()
    }
}

impl Default for ManimCli {
    fn default() -> Self {
        Self::new("python3")
    }
}

impl SceneBackend for ManimCli {
    fn load(&self, script: &Path, class_name: &str) -> Result<LoadedScene> {
        let args = vec![
            OsString::from("-c"),
            OsString::from(LOAD_CHECK),
            script.as_os_str().to_owned(),
            OsString::from(class_name),
        ];

        let output = self
            .run(&args)
            .map_err(|e| Error::Load(format!("failed to start {}: {}", self.python.display(), e)))?;

        if !output.status.success() {
            return Err(Error::Load(failure_message(&output)));
        }

        info!("Resolved scene class {}", class_name);
        Ok(LoadedScene {
            script: script.to_path_buf(),
            class_name: class_name.to_string(),
        })
    }

    fn render(&self, scene: &LoadedScene, config: &RenderConfig) -> Result<()> {
        let args = render_args(scene, config);
        info!(
            "Rendering {} ({} quality, {} renderer)",
            scene.class_name,
            config.quality.flag(),
            config.renderer.flag()
        );

        let output = self
            .run(&args)
            .map_err(|e| Error::Render(format!("failed to start {}: {}", self.python.display(), e)))?;

        if !output.status.success() {
            return Err(Error::Render(failure_message(&output)));
        }

        Ok(())
    }
}

/// Arguments for `python -m manim render` under `config`
pub fn render_args(scene: &LoadedScene, config: &RenderConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-m", "manim", "render", "--progress_bar", "none"]
        .into_iter()
        .map(OsString::from)
        .collect();

    args.push("--media_dir".into());
    args.push(config.media_dir.as_os_str().to_owned());
    args.push("--format".into());
    args.push(config.format.extension().into());
    args.push("--quality".into());
    args.push(config.quality.flag().into());
    args.push("--renderer".into());
    args.push(config.renderer.flag().into());

    // The OpenGL renderer opens a preview window instead of writing a file by default
    if config.renderer == Renderer::OpenGl {
        args.push("--write_to_movie".into());
    }

    args.push(scene.script.as_os_str().to_owned());
    args.push(scene.class_name.clone().into());
    args
}

/// Last meaningful line the process printed, usually the exception
fn failure_message(output: &Output) -> String {
    let last_line = |bytes: &[u8]| {
        String::from_utf8_lossy(bytes)
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
    };

    last_line(&output.stderr)
        .or_else(|| last_line(&output.stdout))
        .unwrap_or_else(|| format!("process exited with {}", output.status))
}
