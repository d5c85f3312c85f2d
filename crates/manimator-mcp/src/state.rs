//! Runner thread for the MCP server
//!
//! Rendering blocks for the whole duration of the engine run, and the
//! workspace must never be used by two executions at once. The runner lives
//! on a dedicated thread and tool calls reach it via message passing, which
//! queues concurrent requests instead of interleaving them.

use std::path::{Path, PathBuf};
use std::thread;

use manimator_engine::{CleanupOutcome, RenderOutcome, SceneBackend, SceneRunner};
use tokio::sync::{mpsc, oneshot};
use tracing::error;

/// Commands sent to the runner thread
enum Command {
    Execute {
        code: String,
        respond: oneshot::Sender<RenderOutcome>,
    },
    Cleanup {
        directory: PathBuf,
        respond: oneshot::Sender<CleanupOutcome>,
    },
}

/// Handle to the runner thread
///
/// This is Send + Sync and can be cloned and shared between tasks.
#[derive(Clone)]
pub struct RunnerHandle {
    sender: mpsc::UnboundedSender<Command>,
    workspace: PathBuf,
}

impl RunnerHandle {
    /// Move `runner` onto its own thread and return a handle to it
    pub fn spawn<B: SceneBackend + 'static>(runner: SceneRunner<B>) -> Self {
        let workspace = runner.workspace().root().to_path_buf();
        let (tx, mut rx) = mpsc::unbounded_channel::<Command>();

        thread::spawn(move || {
            while let Some(cmd) = rx.blocking_recv() {
                match cmd {
                    Command::Execute { code, respond } => {
                        let _ = respond.send(runner.execute(&code));
                    }
                    Command::Cleanup { directory, respond } => {
                        let _ = respond.send(runner.cleanup(&directory));
                    }
                }
            }
        });

        Self {
            sender: tx,
            workspace,
        }
    }

    /// Workspace directory the runner renders into
    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Execute generated scene code, waiting for any queued run to finish first
    pub async fn execute(&self, code: &str) -> RenderOutcome {
        let (tx, rx) = oneshot::channel();
        if self
            .sender
            .send(Command::Execute {
                code: code.to_string(),
                respond: tx,
            })
            .is_err()
        {
            error!("Scene runner thread has stopped");
            return RenderOutcome::failed("scene runner is not running");
        }

        rx.await
            .unwrap_or_else(|_| RenderOutcome::failed("scene runner dropped the request"))
    }

    /// Remove a directory
    pub async fn cleanup(&self, directory: &Path) -> CleanupOutcome {
        let (tx, rx) = oneshot::channel();
        let failed = |reason: &str| CleanupOutcome::Failed {
            path: directory.to_path_buf(),
            reason: reason.to_string(),
        };

        if self
            .sender
            .send(Command::Cleanup {
                directory: directory.to_path_buf(),
                respond: tx,
            })
            .is_err()
        {
            return failed("scene runner is not running");
        }

        rx.await
            .unwrap_or_else(|_| failed("scene runner dropped the request"))
    }
}
