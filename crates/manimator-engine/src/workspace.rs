//! Execution workspace
//!
//! One directory holds one scene's script and everything the render step
//! writes. It is wiped at the start of every execution so an artifact left by
//! an earlier run can never be reported as the current one.

use std::fs;
use std::path::{Path, PathBuf};

use manimator_core::outcome::CleanupOutcome;
use manimator_core::scene::SCRIPT_FILE_NAME;
use manimator_core::{Error, Result};
use tracing::{info, warn};

/// Workspace location relative to the host executable's directory
pub const WORKSPACE_SUBDIR: &str = "media/manim_tmp";

/// Directory manim keeps per-animation segments in, next to the combined video
const PARTIAL_SEGMENTS_DIR: &str = "partial_movie_files";

/// The filesystem area used for one execution
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Use `root` as the workspace directory (not created until [`reset`](Self::reset))
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Workspace under the directory holding the current executable
    pub fn beside_executable() -> Result<Self> {
        let exe = std::env::current_exe()?;
        let base = exe
            .parent()
            .ok_or_else(|| Error::Config(format!("{} has no parent directory", exe.display())))?;
        Ok(Self::new(base.join(WORKSPACE_SUBDIR)))
    }

    /// Workspace root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path the scene script is persisted under
    pub fn script_path(&self) -> PathBuf {
        self.root.join(SCRIPT_FILE_NAME)
    }

    /// Delete the workspace (if present) and recreate it empty
    pub fn reset(&self) -> Result<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root)?;
        }
        fs::create_dir_all(&self.root)?;
        info!("Reset workspace {}", self.root.display());
        Ok(())
    }

    /// Write `source` verbatim to the fixed script filename
    pub fn persist_script(&self, source: &str) -> Result<PathBuf> {
        let path = self.script_path();
        fs::write(&path, source)?;
        info!("Wrote scene script to {}", path.display());
        Ok(path)
    }

    /// Shallowest file with `extension` anywhere under the workspace
    ///
    /// Ties at the same depth go to the first path in order. Segment files
    /// under `partial_movie_files` are never returned.
    pub fn find_artifact(&self, extension: &str) -> Option<PathBuf> {
        let Some(root) = self.root.to_str() else {
            warn!("Workspace path is not valid UTF-8: {}", self.root.display());
            return None;
        };

        let pattern = format!("{}/**/*.{}", glob::Pattern::escape(root), extension);
        let mut matches: Vec<PathBuf> = match glob::glob(&pattern) {
            Ok(paths) => paths
                .filter_map(|entry| entry.ok())
                .filter(|p| p.is_file() && !is_partial_segment(p.strip_prefix(&self.root).unwrap_or(p)))
                .collect(),
            Err(e) => {
                warn!("Bad artifact pattern {}: {}", pattern, e);
                return None;
            }
        };

        matches.sort_by(|a, b| {
            a.components()
                .count()
                .cmp(&b.components().count())
                .then_with(|| a.cmp(b))
        });
        matches.into_iter().next()
    }
}

/// `relative` is taken from the workspace root
fn is_partial_segment(relative: &Path) -> bool {
    relative
        .components()
        .any(|c| c.as_os_str() == PARTIAL_SEGMENTS_DIR)
}

/// Remove `path` recursively; an absent directory is reported, not an error
pub fn cleanup_dir(path: &Path) -> CleanupOutcome {
    if !path.exists() {
        warn!("Directory not found: {}", path.display());
        return CleanupOutcome::NotFound(path.to_path_buf());
    }

    match fs::remove_dir_all(path) {
        Ok(()) => {
            info!("Cleaned up directory: {}", path.display());
            CleanupOutcome::Removed(path.to_path_buf())
        }
        Err(e) => {
            warn!("Error during cleanup of {}: {}", path.display(), e);
            CleanupOutcome::Failed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        }
    }
}
