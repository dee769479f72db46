// crates/host/src/settings.rs

//! Host configuration from the environment.

use anyhow::{Context, Result};

use arogyam_core::agent_config::StdioServerParams;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_SURGE_TOOL_COMMAND: &str = "capabilities/target/release/get_historical_surge_data";
pub const DEFAULT_MAX_STEPS: usize = 12;

/// Variable the surge tool reads its data file from.
pub const SURGE_DATA_PATH_VAR: &str = "SURGE_DATA_PATH";

/// Environment variables:
/// - AROGYAM_MODEL: model for every agent, default [`DEFAULT_MODEL`]
/// - AROGYAM_SURGE_TOOL_COMMAND: surge tool executable, default [`DEFAULT_SURGE_TOOL_COMMAND`]
/// - AROGYAM_SURGE_TOOL_ARGS: extra arguments, whitespace separated
/// - AROGYAM_SURGE_DATA_PATH: surge history JSON file, passed to the tool as `SURGE_DATA_PATH`
/// - AROGYAM_MAX_STEPS: tool-calling steps per agent run, default [`DEFAULT_MAX_STEPS`]
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model: String,
    pub surge_tool: StdioServerParams,
    pub max_steps: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let model = non_empty("AROGYAM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let command = non_empty("AROGYAM_SURGE_TOOL_COMMAND")
            .unwrap_or_else(|| DEFAULT_SURGE_TOOL_COMMAND.to_string());
        let args = non_empty("AROGYAM_SURGE_TOOL_ARGS").unwrap_or_default();
        let mut surge_tool = StdioServerParams::new(command).with_args(args.split_whitespace());
        if let Some(path) = non_empty("AROGYAM_SURGE_DATA_PATH") {
            surge_tool = surge_tool.with_env(SURGE_DATA_PATH_VAR, path.trim());
        }

        let max_steps = match non_empty("AROGYAM_MAX_STEPS") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .with_context(|| format!("AROGYAM_MAX_STEPS must be a positive integer, got '{}'", raw))?,
            None => DEFAULT_MAX_STEPS,
        };

        Ok(Self {
            model,
            surge_tool,
            max_steps,
        })
    }
}
