// crates/host/src/toolsets.rs

//! Maps each agent to the tool providers built from its toolset configs.

use std::collections::HashMap;

use arogyam_core::agent_config::{AgentConfig, ToolsetConfig};
use arogyam_core::stdio_toolset::StdioToolset;
use arogyam_core::tool_provider::ToolProvider;

#[derive(Default)]
pub struct ToolRegistry {
    providers: HashMap<String, Vec<Box<dyn ToolProvider>>>,
}

impl ToolRegistry {
    /// Build providers for every agent in the tree. Stdio processes are not
    /// started until an agent first lists or calls its tools.
    pub fn connect(root: &AgentConfig) -> Self {
        let mut registry = Self::default();
        for agent in root.walk() {
            for toolset in &agent.toolsets {
                tracing::debug!(agent = %agent.name, toolset = %toolset.label(), "registering toolset");
                registry.add(&agent.name, provider_for(toolset));
            }
        }
        registry
    }

    #[cfg(test)]
    pub fn empty() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_provider(mut self, agent: &str, provider: impl ToolProvider + 'static) -> Self {
        self.add(agent, Box::new(provider));
        self
    }

    fn add(&mut self, agent: &str, provider: Box<dyn ToolProvider>) {
        self.providers
            .entry(agent.to_string())
            .or_default()
            .push(provider);
    }

    pub fn providers(&self, agent: &str) -> &[Box<dyn ToolProvider>] {
        self.providers.get(agent).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn provider_for(toolset: &ToolsetConfig) -> Box<dyn ToolProvider> {
    match toolset {
        ToolsetConfig::Stdio {
            server,
            tool_filter,
        } => Box::new(StdioToolset::new(server.clone()).with_tool_filter(tool_filter.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arogyam_core::agent_config::StdioServerParams;

    #[test]
    fn test_connect_registers_per_agent() {
        let root = AgentConfig::new("root", "m").with_sub_agent(
            AgentConfig::new("analyst", "m")
                .with_toolset(ToolsetConfig::stdio(StdioServerParams::new("surge-tool"))),
        );
        let registry = ToolRegistry::connect(&root);
        assert!(registry.providers("root").is_empty());
        assert_eq!(registry.providers("analyst").len(), 1);
        assert_eq!(registry.providers("analyst")[0].name(), "stdio:surge-tool");
        assert!(registry.providers("nobody").is_empty());
    }
}
