// crates/host/src/agents/coordinator/mod.rs

//! Root agent: plans hospital resources and delegates history lookups.

mod prompts;

use chrono::NaiveDate;

use arogyam_core::agent_config::{AgentConfig, StdioServerParams};

use super::surge_analyst;

pub const NAME: &str = "hospital_resource_coordinator";

pub fn agent(model: &str, surge_tool: StdioServerParams, today: NaiveDate) -> AgentConfig {
    AgentConfig::new(NAME, model)
        .with_description(prompts::DESCRIPTION)
        .with_instruction(prompts::build_coordinator_prompt(today, surge_analyst::NAME))
        .with_sub_agent(surge_analyst::agent(model, surge_tool))
}
