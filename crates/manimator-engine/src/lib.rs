//! Manimator Engine - execution runtime for generated scenes
//!
//! The engine is the execution side of the tool host. It owns the workspace,
//! drives the rendering engine through a [`SceneBackend`], and turns every
//! result into a [`RenderOutcome`].
//!
//! ## Example
//!
//! ```ignore
//! use manimator_engine::{ManimCli, RenderConfig, SceneRunner, Workspace};
//!
//! let runner = SceneRunner::new(
//!     Workspace::beside_executable()?,
//!     ManimCli::default(),
//!     RenderConfig::default(),
//! );
//!
//! // "Success:/.../CircleGrow.mp4" or "Failed: ..."
//! println!("{}", runner.execute(code));
//! ```

pub mod backend;
pub mod runner;
pub mod workspace;

pub use backend::{LoadedScene, ManimCli, SceneBackend};
pub use runner::SceneRunner;
pub use workspace::{Workspace, cleanup_dir};

// Re-export commonly used types from core
pub use manimator_core::config::{OutputFormat, Quality, RenderConfig, Renderer};
pub use manimator_core::outcome::{CleanupOutcome, RenderOutcome};
