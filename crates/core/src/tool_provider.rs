// crates/core/src/tool_provider.rs

//! Tool provider abstraction.
//!
//! Agents only see `ToolProvider`; where the tools actually run (a stdio
//! process, an in-process mock) is decided by whoever builds the provider.

use anyhow::Result;
use serde_json::{json, Value};

/// A tool as advertised by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON Schema for the arguments object.
    pub input_schema: Value,
}

impl ToolSpec {
    /// Function definition in chat-completions `tools` format.
    pub fn to_chat_tool(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.input_schema,
            }
        })
    }
}

/// Result of a tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub content: Value,
    /// The tool ran but reported a failure (e.g. an invalid argument).
    pub is_error: bool,
}

impl ToolOutput {
    pub fn ok(content: Value) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    pub fn error(content: Value) -> Self {
        Self {
            content,
            is_error: true,
        }
    }

    /// Text to hand back to the model. Errors get an `ERROR: ` prefix.
    pub fn to_message_content(&self) -> String {
        let body = match &self.content {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if self.is_error {
            format!("ERROR: {}", body)
        } else {
            body
        }
    }
}

/// Anything that can list and call tools.
pub trait ToolProvider: Send + Sync {
    /// Label used in logs.
    fn name(&self) -> &str;

    fn list_tools(&self) -> Result<Vec<ToolSpec>>;

    /// Call a tool. `Err` means the call could not be made at all; a tool
    /// that ran and failed returns `Ok` with `is_error` set.
    fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_chat_tool() {
        let spec = ToolSpec {
            name: "get_historical_surge_data".into(),
            description: "Surge history".into(),
            input_schema: json!({ "type": "object", "properties": {} }),
        };
        let tool = spec.to_chat_tool();
        assert_eq!(tool["type"], "function");
        assert_eq!(tool["function"]["name"], "get_historical_surge_data");
        assert_eq!(tool["function"]["parameters"]["type"], "object");
    }

    #[test]
    fn test_message_content() {
        assert_eq!(ToolOutput::ok(json!({ "a": 1 })).to_message_content(), r#"{"a":1}"#);
        assert_eq!(ToolOutput::ok(json!("plain")).to_message_content(), "plain");
        assert_eq!(
            ToolOutput::error(json!({ "error": "Invalid month: 13" })).to_message_content(),
            r#"ERROR: {"error":"Invalid month: 13"}"#
        );
    }
}
