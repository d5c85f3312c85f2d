//! MCP tool parameters for Manimator
//!
//! - Execution (execute_manim_code)
//! - Cleanup (cleanup_manim_temp_dir)

pub mod cleanup;
pub mod execute;
