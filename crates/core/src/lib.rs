//! Building blocks for the Arogyam hospital resource agents: the LLM client,
//! declarative agent configuration and tool providers.

pub mod agent_config;
pub mod ai_client;
pub mod chat_client;
pub mod stdio_toolset;
pub mod tool_provider;
