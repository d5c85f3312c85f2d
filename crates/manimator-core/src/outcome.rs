//! Execution outcomes and their wire strings
//!
//! Tool calls cross a process boundary as plain text. The host formats a
//! [`RenderOutcome`] with `Display`; the client recovers it with
//! [`ToolReply::parse`].

use std::fmt;
use std::path::{Path, PathBuf};

const SUCCESS_PREFIX: &str = "Success:";
const FAILED_PREFIX: &str = "Failed:";

/// Result of executing one generated scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Render finished and produced this artifact
    Rendered(PathBuf),
    /// Render finished but no artifact was found under the workspace
    NoArtifact {
        workspace: PathBuf,
        extension: String,
    },
    /// Any step failed; carries a one-line reason
    Failed(String),
}

impl RenderOutcome {
    /// Degraded success for a workspace with no `mp4`
    pub fn no_mp4(workspace: impl Into<PathBuf>) -> Self {
        RenderOutcome::NoArtifact {
            workspace: workspace.into(),
            extension: "mp4".to_string(),
        }
    }

    /// Failure from any displayable error
    pub fn failed(reason: impl fmt::Display) -> Self {
        RenderOutcome::Failed(reason.to_string())
    }

    /// Whether this carries an authoritative artifact path
    pub fn is_rendered(&self) -> bool {
        matches!(self, RenderOutcome::Rendered(_))
    }

    /// Artifact path, if one was produced
    pub fn artifact(&self) -> Option<&Path> {
        match self {
            RenderOutcome::Rendered(path) => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for RenderOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderOutcome::Rendered(path) => write!(f, "{SUCCESS_PREFIX}{}", path.display()),
            RenderOutcome::NoArtifact {
                workspace,
                extension,
            } => write!(f, "{SUCCESS_PREFIX}{} (no {extension} found)", workspace.display()),
            RenderOutcome::Failed(reason) => write!(f, "{FAILED_PREFIX} {reason}"),
        }
    }
}

/// Client-side view of an `execute_manim_code` reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolReply {
    /// Authoritative artifact path
    Rendered(PathBuf),
    /// Render ran but the host found no artifact; path is the workspace
    NoArtifact(PathBuf),
    /// Host reported a failure (or replied with something unrecognised)
    Failed(String),
}

impl ToolReply {
    /// Parse a wire string produced by the tool host
    pub fn parse(reply: &str) -> Self {
        let reply = reply.trim();

        if let Some(rest) = reply.strip_prefix(SUCCESS_PREFIX) {
            let rest = rest.trim();
            if let Some(open) = rest.rfind(" (no ")
                && rest.ends_with(" found)")
            {
                return ToolReply::NoArtifact(PathBuf::from(rest[..open].trim()));
            }
            return ToolReply::Rendered(PathBuf::from(rest));
        }

        if let Some(reason) = reply.strip_prefix(FAILED_PREFIX) {
            return ToolReply::Failed(reason.trim().to_string());
        }

        ToolReply::Failed(reply.to_string())
    }
}

impl From<RenderOutcome> for ToolReply {
    fn from(outcome: RenderOutcome) -> Self {
        match outcome {
            RenderOutcome::Rendered(path) => ToolReply::Rendered(path),
            RenderOutcome::NoArtifact { workspace, .. } => ToolReply::NoArtifact(workspace),
            RenderOutcome::Failed(reason) => ToolReply::Failed(reason),
        }
    }
}

/// Result of removing a workspace directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    Removed(PathBuf),
    NotFound(PathBuf),
    Failed { path: PathBuf, reason: String },
}

impl CleanupOutcome {
    /// Removed or already absent
    pub fn is_ok(&self) -> bool {
        !matches!(self, CleanupOutcome::Failed { .. })
    }
}

impl fmt::Display for CleanupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupOutcome::Removed(path) => {
                write!(f, "Cleanup successful for directory: {}", path.display())
            }
            CleanupOutcome::NotFound(path) => write!(f, "Directory not found: {}", path.display()),
            CleanupOutcome::Failed { path, reason } => write!(
                f,
                "Failed to clean up directory: {}. Error: {reason}",
                path.display()
            ),
        }
    }
}
