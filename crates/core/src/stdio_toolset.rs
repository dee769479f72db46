// crates/core/src/stdio_toolset.rs

//! Tools served by a local MCP server process over stdio.
//!
//! Contract:
//! - The process is spawned lazily on first use and kept for later calls
//! - The MCP session (handshake, framing, request ids) is rmcp's
//! - The child's stderr is inherited so its logs show up next to ours
//! - Calls are synchronous: each one blocks on a runtime owned by the toolset

use std::future::Future;
use std::sync::Mutex;

use anyhow::{anyhow, bail, Context, Result};
use once_cell::sync::OnceCell;
use rmcp::model::{CallToolRequestParam, CallToolResult, RawContent};
use rmcp::service::{Peer, RoleClient, RunningService};
use rmcp::transport::TokioChildProcess;
use rmcp::ServiceExt;
use serde_json::Value;
use tokio::process::Command;
use tokio::runtime::Runtime;

use crate::agent_config::StdioServerParams;
use crate::tool_provider::{ToolOutput, ToolProvider, ToolSpec};

type Session = RunningService<RoleClient, ()>;

/// [`ToolProvider`] backed by an MCP server process.
pub struct StdioToolset {
    label: String,
    params: StdioServerParams,
    tool_filter: Option<Vec<String>>,
    runtime: OnceCell<Runtime>,
    session: Mutex<Option<Session>>,
}

impl StdioToolset {
    pub fn new(params: StdioServerParams) -> Self {
        Self {
            label: format!("stdio:{}", params.command),
            params,
            tool_filter: None,
            runtime: OnceCell::new(),
            session: Mutex::new(None),
        }
    }

    pub fn with_tool_filter(mut self, tool_filter: Option<Vec<String>>) -> Self {
        self.tool_filter = tool_filter;
        self
    }

    fn allows(&self, tool: &str) -> bool {
        self.tool_filter
            .as_ref()
            .map_or(true, |allowed| allowed.iter().any(|t| t == tool))
    }

    fn runtime(&self) -> Result<&Runtime> {
        self.runtime.get_or_try_init(|| {
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .thread_name("stdio-toolset")
                .enable_all()
                .build()
                .context("failed to start tool runtime")
        })
    }

    /// Run `f` against a live session, spawning one if needed. A session whose
    /// request failed is dropped (killing the process) so the next call starts
    /// a fresh one.
    fn with_peer<T, F, Fut>(&self, f: F) -> Result<T>
    where
        F: FnOnce(Peer<RoleClient>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let runtime = self.runtime()?;
        let mut guard = self
            .session
            .lock()
            .map_err(|_| anyhow!("tool session lock poisoned"))?;

        if guard.is_none() {
            *guard = Some(runtime.block_on(connect(&self.params))?);
        }
        let peer = guard
            .as_ref()
            .context("tool session missing after start")?
            .peer()
            .clone();

        let result = runtime.block_on(f(peer));
        if result.is_err() {
            tracing::warn!(toolset = %self.label, "tool session failed, will respawn on next call");
            if let Some(session) = guard.take() {
                let _ = runtime.block_on(session.cancel());
            }
        }
        result
    }
}

async fn connect(params: &StdioServerParams) -> Result<Session> {
    let mut command = Command::new(&params.command);
    command.args(&params.args).envs(&params.env);

    let transport = TokioChildProcess::new(command)
        .with_context(|| format!("failed to spawn tool process '{}'", params.command))?;

    let session = ()
        .serve(transport)
        .await
        .with_context(|| format!("MCP handshake with '{}' failed", params.command))?;

    let server = session
        .peer_info()
        .map(|info| info.server_info.name.clone())
        .unwrap_or_else(|| "unknown".to_string());
    tracing::info!(command = %params.command, %server, "tool process connected");
    Ok(session)
}

impl Drop for StdioToolset {
    fn drop(&mut self) {
        let session = self.session.get_mut().ok().and_then(Option::take);
        if let (Some(session), Some(runtime)) = (session, self.runtime.get()) {
            if let Err(e) = runtime.block_on(session.cancel()) {
                tracing::debug!(toolset = %self.label, error = %e, "tool session did not shut down cleanly");
            }
        }
    }
}

impl ToolProvider for StdioToolset {
    fn name(&self) -> &str {
        &self.label
    }

    fn list_tools(&self) -> Result<Vec<ToolSpec>> {
        let tools = self.with_peer(|peer| async move {
            peer.list_all_tools().await.context("tools/list failed")
        })?;

        Ok(tools
            .into_iter()
            .map(|tool| ToolSpec {
                name: tool.name.to_string(),
                description: tool.description.map(|d| d.to_string()).unwrap_or_default(),
                input_schema: Value::Object(tool.input_schema.as_ref().clone()),
            })
            .filter(|spec| self.allows(&spec.name))
            .collect())
    }

    fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolOutput> {
        if !self.allows(name) {
            bail!("tool '{}' is not exposed by {}", name, self.label);
        }
        let arguments = match arguments {
            Value::Object(map) => Some(map),
            Value::Null => None,
            other => bail!("tool arguments must be a JSON object, got {}", other),
        };
        let request = CallToolRequestParam {
            name: name.to_string().into(),
            arguments,
        };

        let result = self.with_peer(|peer| async move {
            peer.call_tool(request).await.context("tools/call failed")
        })?;
        Ok(tool_output(result))
    }
}

/// Prefers `structuredContent`; otherwise joins the text blocks and decodes
/// them as JSON when possible.
pub fn tool_output(result: CallToolResult) -> ToolOutput {
    let is_error = result.is_error.unwrap_or(false);

    let content = match result.structured_content {
        Some(structured) if !structured.is_null() => structured,
        _ => {
            let text = result
                .content
                .iter()
                .filter_map(|block| match &block.raw {
                    RawContent::Text(text) => Some(text.text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n");
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        }
    };

    ToolOutput { content, is_error }
}
