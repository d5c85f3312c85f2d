//! # Manimator Core
//!
//! Natural language to rendered Manim animations.
//!
//! This crate holds the pieces shared by the tool host and the client:
//!
//! - [`schema`] - turn a tool host's declared parameter schemas into
//!   function declarations a language model can call
//! - [`scene`] - normalise generated source text and find its Scene subclass
//! - [`config`] - render configuration and its scoped override
//! - [`outcome`] - tagged execution results and their wire strings
//!
//! ## Pipeline
//!
//! ```text
//! description -> model -> GeneratedScene -> execute_manim_code -> RenderOutcome
//! ```

pub mod config;
pub mod outcome;
pub mod scene;
pub mod schema;

mod error;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ConfigScope, OutputFormat, Quality, RenderConfig, RenderSettings, Renderer};
    pub use crate::outcome::{CleanupOutcome, RenderOutcome, ToolReply};
    pub use crate::scene::{GeneratedScene, find_scene_class, strip_code_fences};
    pub use crate::schema::{FunctionDeclaration, ToolDescriptor, sanitize, to_function_declarations};
    pub use crate::{Error, Result};
}
