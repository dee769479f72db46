//! MCP tool server over stdio.
//!
//! `ToolServer` owns a fixed set of [`Tool`]s and answers `tools/list` and
//! `tools/call` through rmcp's [`ServerHandler`]; the handshake, framing and
//! JSON-RPC plumbing are rmcp's. Tool failures come back as `isError` results
//! carrying `{"error": ...}`, never as protocol faults.

use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParam, CallToolResult, ErrorData, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ServerHandler, ServiceExt};
use serde_json::{json, Value};
use thiserror::Error;

use crate::CapabilityError;

/// A callable tool exposed by a capability process.
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema for the `arguments` object.
    fn input_schema(&self) -> Value;

    /// Run the tool. An `Err` is reported to the caller as a tool-level error
    /// result, not as a protocol fault.
    fn call(&self, arguments: Value) -> Result<Value, CapabilityError>;
}

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("MCP session failed to start: {0}")]
    Start(String),

    #[error("MCP session ended abnormally: {0}")]
    Session(String),
}

/// Serves a fixed set of tools to a single client.
pub struct ToolServer {
    name: String,
    version: String,
    tools: Vec<Box<dyn Tool>>,
}

impl ToolServer {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            tools: Vec::new(),
        }
    }

    /// Register a tool.
    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.push(Box::new(tool));
        self
    }

    /// Names of the registered tools, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Tool descriptors as advertised in `tools/list`.
    pub fn tool_list(&self) -> Vec<rmcp::model::Tool> {
        self.tools
            .iter()
            .map(|t| {
                let schema = match t.input_schema() {
                    Value::Object(map) => map,
                    _ => JsonObject::new(),
                };
                rmcp::model::Tool::new(t.name().to_string(), t.description().to_string(), Arc::new(schema))
            })
            .collect()
    }

    /// Run one `tools/call`. Only an unknown tool name is a protocol error.
    pub fn call(&self, name: &str, arguments: Option<JsonObject>) -> Result<CallToolResult, ErrorData> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| ErrorData::invalid_params(format!("Unknown tool: {}", name), None))?;

        let arguments = Value::Object(arguments.unwrap_or_default());
        tracing::info!(tool = %name, %arguments, "tool call");

        match tool.call(arguments) {
            Ok(body) => Ok(CallToolResult::structured(body)),
            Err(e) => {
                tracing::warn!(tool = %name, error = %e, "tool returned an error");
                Ok(CallToolResult::structured_error(json!({ "error": e.error })))
            }
        }
    }

    /// Serve on stdin/stdout until the client disconnects.
    pub async fn serve_stdio(self) -> Result<(), ServeError> {
        tracing::info!(
            server = %self.name,
            version = %self.version,
            tools = ?self.tool_names(),
            "serving tools on stdio"
        );

        let service = self
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| ServeError::Start(e.to_string()))?;
        let reason = service
            .waiting()
            .await
            .map_err(|e| ServeError::Session(e.to_string()))?;

        tracing::info!(?reason, "client disconnected, shutting down");
        Ok(())
    }
}

impl ServerHandler for ToolServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name.clone(),
                version: self.version.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tool_list()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.call(&request.name, request.arguments)
    }
}
