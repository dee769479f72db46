// crates/host/src/agents/surge_analyst/mod.rs

//! Sub-agent that answers questions from the surge history tool.

mod prompts;

use arogyam_core::agent_config::{AgentConfig, StdioServerParams, ToolsetConfig};

pub const NAME: &str = "surge_history_analyst";
pub const SURGE_TOOL: &str = "get_historical_surge_data";

pub fn agent(model: &str, surge_tool: StdioServerParams) -> AgentConfig {
    AgentConfig::new(NAME, model)
        .with_description(prompts::DESCRIPTION)
        .with_instruction(prompts::INSTRUCTION)
        .with_toolset(ToolsetConfig::stdio(surge_tool).with_tool_filter([SURGE_TOOL]))
}
