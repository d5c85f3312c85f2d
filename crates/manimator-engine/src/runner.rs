//! Scene runner
//!
//! Carries one untrusted source text through a fixed sequence:
//! reset workspace, persist script, locate the Scene subclass, load it,
//! render it under a scoped config, then look for the artifact. Every error
//! (including a panicking backend) ends as [`RenderOutcome::Failed`].

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use manimator_core::config::{RenderConfig, RenderSettings};
use manimator_core::outcome::{CleanupOutcome, RenderOutcome};
use manimator_core::scene::find_scene_class;
use manimator_core::{Error, Result};
use tracing::{error, info, warn};

use crate::backend::SceneBackend;
use crate::workspace::{Workspace, cleanup_dir};

/// Executes generated scenes inside a single workspace
///
/// Not meant to be shared between concurrent requests: each execution starts
/// by deleting the workspace.
pub struct SceneRunner<B> {
    workspace: Workspace,
    backend: B,
    template: RenderConfig,
    settings: RenderSettings,
}

impl<B: SceneBackend> SceneRunner<B> {
    /// Create a runner; `template` supplies format, quality and renderer
    pub fn new(workspace: Workspace, backend: B, template: RenderConfig) -> Self {
        let settings = RenderSettings::new(template.clone());
        Self {
            workspace,
            backend,
            template,
            settings,
        }
    }

    /// The workspace this runner writes into
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Host-wide render settings (defaults outside of a render call)
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Execute `code` and report the outcome; never returns an error
    pub fn execute(&self, code: &str) -> RenderOutcome {
        match catch_unwind(AssertUnwindSafe(|| self.try_execute(code))) {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                error!("Error in execute_manim_code: {}", e);
                RenderOutcome::failed(e)
            }
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "render panicked".to_string());
                error!("Panic in execute_manim_code: {}", reason);
                RenderOutcome::Failed(reason)
            }
        }
    }

    fn try_execute(&self, code: &str) -> Result<RenderOutcome> {
        self.workspace.reset()?;
        let script = self.workspace.persist_script(code)?;

        let class_name = find_scene_class(code).ok_or(Error::NoEntryPoint)?;
        let scene = self.backend.load(&script, class_name)?;

        let config = self.template.for_workspace(self.workspace.root());
        let extension = config.format.extension();
        {
            let scope = self.settings.scoped(config);
            self.backend.render(&scene, scope.config())?;
        }

        match self.workspace.find_artifact(extension) {
            Some(path) => {
                info!("Rendered video at {}", path.display());
                Ok(RenderOutcome::Rendered(path))
            }
            None => {
                warn!(
                    "Render finished but no .{} found under {}",
                    extension,
                    self.workspace.root().display()
                );
                Ok(RenderOutcome::NoArtifact {
                    workspace: self.workspace.root().to_path_buf(),
                    extension: extension.to_string(),
                })
            }
        }
    }

    /// Remove an arbitrary directory (typically a previous workspace)
    pub fn cleanup(&self, directory: &Path) -> CleanupOutcome {
        cleanup_dir(directory)
    }
}
