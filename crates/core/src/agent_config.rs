// crates/core/src/agent_config.rs

//! Declarative agent definitions.
//!
//! An agent is a name, a model, an instruction, the toolsets it may call and
//! the sub-agents it may delegate to. Nothing here talks to a model or spawns
//! a process; `ToolsetConfig` only describes how to reach a tool process.

use std::collections::{BTreeMap, HashSet};

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static AGENT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("agent name pattern is valid")
});

/// How to launch a local tool process that speaks JSON-RPC over stdio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdioServerParams {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Extra environment for the child, on top of the inherited one.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl StdioServerParams {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

/// A set of tools an agent can call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolsetConfig {
    /// Tools served by a local process over stdio. `tool_filter`, when set,
    /// limits which of the server's tools the agent sees.
    Stdio {
        server: StdioServerParams,
        #[serde(default)]
        tool_filter: Option<Vec<String>>,
    },
}

impl ToolsetConfig {
    pub fn stdio(server: StdioServerParams) -> Self {
        Self::Stdio {
            server,
            tool_filter: None,
        }
    }

    pub fn with_tool_filter<I, S>(self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self {
            Self::Stdio { server, .. } => Self::Stdio {
                server,
                tool_filter: Some(tools.into_iter().map(Into::into).collect()),
            },
        }
    }

    /// Short human-readable label for logs.
    pub fn label(&self) -> String {
        match self {
            Self::Stdio { server, .. } => format!("stdio:{}", server.command),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub name: String,
    pub model: String,
    pub description: String,
    pub instruction: String,
    pub toolsets: Vec<ToolsetConfig>,
    pub sub_agents: Vec<AgentConfig>,
}

impl AgentConfig {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            description: String::new(),
            instruction: String::new(),
            toolsets: Vec::new(),
            sub_agents: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    pub fn with_toolset(mut self, toolset: ToolsetConfig) -> Self {
        self.toolsets.push(toolset);
        self
    }

    pub fn with_sub_agent(mut self, agent: AgentConfig) -> Self {
        self.sub_agents.push(agent);
        self
    }

    /// Find an agent by name in this tree (including `self`).
    pub fn find(&self, name: &str) -> Option<&AgentConfig> {
        if self.name == name {
            return Some(self);
        }
        self.sub_agents.iter().find_map(|a| a.find(name))
    }

    /// Every agent in the tree, depth first, starting with `self`.
    pub fn walk(&self) -> Vec<&AgentConfig> {
        let mut out = vec![self];
        for sub in &self.sub_agents {
            out.extend(sub.walk());
        }
        out
    }

    /// Check the whole tree: identifier names, unique across the tree, not
    /// the reserved `user`, and a model on every agent.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for agent in self.walk() {
            if !AGENT_NAME.is_match(&agent.name) {
                bail!(
                    "invalid agent name '{}': must start with a letter or underscore and contain only letters, digits and underscores",
                    agent.name
                );
            }
            if agent.name == "user" {
                bail!("agent name 'user' is reserved");
            }
            if agent.model.trim().is_empty() {
                bail!("agent '{}' has no model", agent.name);
            }
            if !seen.insert(agent.name.as_str()) {
                bail!("duplicate agent name '{}'", agent.name);
            }
        }
        Ok(())
    }
}
