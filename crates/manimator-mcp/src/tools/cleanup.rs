//! Workspace cleanup tool parameters

use schemars::JsonSchema;
use serde::Deserialize;

/// Request for removing a directory
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CleanupRequest {
    /// Directory to delete recursively (usually the workspace from a previous render)
    pub directory: String,
}
