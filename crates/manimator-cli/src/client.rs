//! MCP client for the tool host
//!
//! Launches the host as a child process speaking MCP over stdio, discovers
//! its tools once, and calls them with plain string arguments.

use async_trait::async_trait;
use manimator_core::schema::{ToolDescriptor, descriptor_from_json};
use manimator_core::{Error, Result};
use rmcp::model::CallToolRequestParam;
use rmcp::service::RunningService;
use rmcp::transport::TokioChildProcess;
use rmcp::{RoleClient, ServiceExt};
use serde_json::{Value, json};
use tracing::info;

use crate::config::ServerCommand;
use crate::orchestrator::SceneExecutor;

pub const EXECUTE_TOOL: &str = "execute_manim_code";
pub const CLEANUP_TOOL: &str = "cleanup_manim_temp_dir";

/// A live session with the tool host
pub struct ToolHost {
    service: RunningService<RoleClient, ()>,
    tools: Vec<ToolDescriptor>,
}

impl ToolHost {
    /// Start the host process, initialise the session and list its tools
    pub async fn connect(server: &ServerCommand) -> Result<Self> {
        info!("Starting MCP server: {}", server);

        let transport = TokioChildProcess::new(server.to_command())
            .map_err(|e| Error::Connection(format!("failed to start {server}: {e}")))?;

        let service = ()
            .serve(transport)
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        let listed = service
            .list_all_tools()
            .await
            .map_err(|e| Error::Connection(format!("tool discovery failed: {e}")))?;

        let tools = listed
            .iter()
            .map(serde_json::to_value)
            .map(|value| descriptor_from_listing(&value?))
            .collect::<Result<Vec<_>>>()?;

        let host = Self { service, tools };
        info!("Connected. Tools: {:?}", host.tool_names());
        Ok(host)
    }

    /// Tools discovered at connection time
    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Names of the discovered tools, in discovery order
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    /// Call a tool and return the text of its first content item
    pub async fn call(&self, name: &str, arguments: Value) -> Result<String> {
        let result = self
            .service
            .call_tool(CallToolRequestParam {
                name: name.to_string().into(),
                arguments: arguments.as_object().cloned(),
            })
            .await
            .map_err(|e| Error::Connection(format!("{name} call failed: {e}")))?;

        let text = result
            .content
            .first()
            .and_then(|content| content.as_text())
            .map(|t| t.text.clone())
            .ok_or_else(|| Error::Tool(format!("{name} returned no text content")))?;

        if result.is_error == Some(true) {
            return Err(Error::Tool(text));
        }
        Ok(text)
    }

    /// End the session and stop the host process
    pub async fn shutdown(self) -> Result<()> {
        info!("Cleaning up MCP session...");
        self.service
            .cancel()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        Ok(())
    }
}

/// Convert one listed tool; a tool that cannot be read fails discovery
fn descriptor_from_listing(tool: &Value) -> Result<ToolDescriptor> {
    tool.as_object()
        .and_then(descriptor_from_json)
        .ok_or_else(|| Error::Connection(format!("unreadable tool in discovery listing: {tool}")))
}

#[async_trait]
impl SceneExecutor for ToolHost {
    async fn execute(&self, code: &str) -> Result<String> {
        self.call(EXECUTE_TOOL, json!({ "manim_code": code })).await
    }

    async fn cleanup(&self, directory: &str) -> Result<String> {
        self.call(CLEANUP_TOOL, json!({ "directory": directory })).await
    }
}
