// crates/host/src/agents/runner/tool_defs.rs

//! Built-in tools the runner adds on top of an agent's toolsets.

use serde_json::{json, Value};

use arogyam_core::agent_config::AgentConfig;

pub const TRANSFER_PREFIX: &str = "transfer_to_";

pub fn transfer_tool_name(sub_agent: &str) -> String {
    format!("{}{}", TRANSFER_PREFIX, sub_agent)
}

/// Delegation tool for one sub-agent.
pub fn transfer_tool_definition(sub_agent: &AgentConfig) -> Value {
    let description = if sub_agent.description.is_empty() {
        format!("Hand a request to the '{}' agent and get its answer.", sub_agent.name)
    } else {
        format!(
            "Hand a request to the '{}' agent and get its answer. {}",
            sub_agent.name, sub_agent.description
        )
    };

    json!({
        "type": "function",
        "function": {
            "name": transfer_tool_name(&sub_agent.name),
            "description": description,
            "parameters": {
                "type": "object",
                "properties": {
                    "request": {
                        "type": "string",
                        "description": "What the agent should do, with all context it needs. It cannot see this conversation."
                    }
                },
                "required": ["request"]
            }
        }
    })
}
