//! Manimator MCP Server - Model Context Protocol tool host for Manim rendering
//!
//! This crate exposes the scene runner to MCP clients. A client (usually one
//! that just asked a language model for Manim code) can:
//!
//! - Render a scene with `execute_manim_code`
//! - Remove a leftover workspace with `cleanup_manim_temp_dir`
//!
//! Both tools always succeed at the protocol level. The outcome travels in
//! the single text content: `Success:<path>`, `Success:<workspace> (no mp4
//! found)` or `Failed: <reason>`.

pub mod state;
pub mod tools;

use std::path::Path;

use rmcp::{
    ErrorData as McpError,
    ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use tracing::{info, warn};

use crate::state::RunnerHandle;
use crate::tools::{cleanup::CleanupRequest, execute::ExecuteManimCodeRequest};

// Re-export for binary
pub use rmcp;

/// The Manimator MCP service
///
/// Implements the MCP ServerHandler to expose the scene runner as MCP tools.
/// The runner sits behind a channel, so the service is Send + Sync.
#[derive(Clone)]
pub struct ManimMcpService {
    runner: RunnerHandle,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ManimMcpService {
    /// Create a new MCP service backed by the given runner
    pub fn new(runner: RunnerHandle) -> Self {
        Self {
            runner,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Write out the Manim code, import it, render its Scene subclass, and return the path to the rendered .mp4. Replies 'Success:<path>' or 'Failed: <reason>'.")]
    async fn execute_manim_code(
        &self,
        params: Parameters<ExecuteManimCodeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let request = params.0;
        info!("execute_manim_code ({} bytes)", request.manim_code.len());

        let outcome = self.runner.execute(&request.manim_code).await;
        if outcome.is_rendered() {
            info!("execute_manim_code: {}", outcome);
        } else {
            warn!("execute_manim_code: {}", outcome);
        }
        Ok(CallToolResult::success(vec![Content::text(outcome.to_string())]))
    }

    #[tool(description = "Clean up the specified Manim temporary directory after execution.")]
    async fn cleanup_manim_temp_dir(
        &self,
        params: Parameters<CleanupRequest>,
    ) -> Result<CallToolResult, McpError> {
        let request = params.0;
        let outcome = self.runner.cleanup(Path::new(&request.directory)).await;
        if !outcome.is_ok() {
            warn!("cleanup_manim_temp_dir: {}", outcome);
        }
        Ok(CallToolResult::success(vec![Content::text(outcome.to_string())]))
    }
}

#[tool_handler]
impl ServerHandler for ManimMcpService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "manimator-mcp".to_string(),
                title: Some("Manimator Scene Renderer".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(format!(
                "Renders Manim scenes.\n\n\
                 execute_manim_code(manim_code) - render the single Scene subclass in the code; \
                 the workspace {} is wiped first.\n\
                 cleanup_manim_temp_dir(directory) - delete a directory when done.",
                self.runner.workspace().display()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manimator_core::Result;
    use manimator_engine::{LoadedScene, RenderConfig, SceneBackend, SceneRunner, Workspace};

    struct WritesVideo;

    impl SceneBackend for WritesVideo {
        fn load(&self, script: &Path, class_name: &str) -> Result<LoadedScene> {
            Ok(LoadedScene {
                script: script.to_path_buf(),
                class_name: class_name.to_string(),
            })
        }

        fn render(&self, scene: &LoadedScene, config: &RenderConfig) -> Result<()> {
            std::fs::write(config.media_dir.join(format!("{}.mp4", scene.class_name)), b"")?;
            Ok(())
        }
    }

    fn service(root: &Path) -> ManimMcpService {
        let runner = SceneRunner::new(Workspace::new(root), WritesVideo, RenderConfig::default());
        ManimMcpService::new(RunnerHandle::spawn(runner))
    }

    fn reply_text(result: &CallToolResult) -> String {
        result
            .content
            .first()
            .and_then(|c| c.as_text())
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_tools_exposed() {
        let tools = ManimMcpService::tool_router().list_all();
        let mut names: Vec<String> = tools.iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names, ["cleanup_manim_temp_dir", "execute_manim_code"]);

        let execute = tools.iter().find(|t| t.name == "execute_manim_code").unwrap();
        let properties = execute.input_schema.get("properties").unwrap();
        assert!(properties.get("manim_code").is_some());
    }

    #[tokio::test]
    async fn test_execute_reports_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let ws = tmp.path().join("ws");
        let service = service(&ws);

        let result = service
            .execute_manim_code(Parameters(ExecuteManimCodeRequest {
                manim_code: "class Dot(Scene):\n    pass".into(),
            }))
            .await
            .unwrap();

        assert_eq!(reply_text(&result), format!("Success:{}", ws.join("Dot.mp4").display()));
    }

    #[tokio::test]
    async fn test_execute_without_scene_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let service = service(tmp.path());

        let result = service
            .execute_manim_code(Parameters(ExecuteManimCodeRequest {
                manim_code: "print(\"hello\")".into(),
            }))
            .await
            .unwrap();

        assert_eq!(reply_text(&result), "Failed: no scene subclass found");
    }

    #[tokio::test]
    async fn test_cleanup_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let service = service(tmp.path());
        let missing = tmp.path().join("never-created");

        let result = service
            .cleanup_manim_temp_dir(Parameters(CleanupRequest {
                directory: missing.display().to_string(),
            }))
            .await
            .unwrap();

        assert_eq!(reply_text(&result), format!("Directory not found: {}", missing.display()));
    }
}
