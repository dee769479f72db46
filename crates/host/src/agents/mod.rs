// crates/host/src/agents/mod.rs

//! Agent definitions and the loop that runs them.
//!
//! Each agent is self-contained with its own:
//! - mod.rs (config builder)
//! - prompts.rs (description and system prompt)

pub mod log;
pub mod runner;

pub mod coordinator;
pub mod surge_analyst;

use chrono::NaiveDate;

use arogyam_core::agent_config::AgentConfig;

use crate::settings::Settings;

pub use runner::AgentRunner;

/// The agent tree the host runs: coordinator at the root, analyst below it.
pub fn root_agent(settings: &Settings, today: NaiveDate) -> AgentConfig {
    coordinator::agent(&settings.model, settings.surge_tool.clone(), today)
}
