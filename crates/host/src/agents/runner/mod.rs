// crates/host/src/agents/runner/mod.rs

//! Tool-calling loop for one agent config.
//!
//! Each step sends the conversation to the model. Tool calls are dispatched
//! to the agent's providers or, for `transfer_to_<name>`, to a nested run of
//! the sub-agent. The first reply without tool calls is the answer.

mod tool_defs;

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};

use arogyam_core::agent_config::AgentConfig;
use arogyam_core::ai_client::{AiClient, ChatRequest, ChatToolCall};
use arogyam_core::tool_provider::ToolProvider;

use super::log;
use crate::settings::DEFAULT_MAX_STEPS;
use crate::toolsets::ToolRegistry;

pub use tool_defs::{transfer_tool_name, TRANSFER_PREFIX};

type Routes<'a> = HashMap<String, &'a dyn ToolProvider>;

pub struct AgentRunner<'a, C: AiClient> {
    client: &'a C,
    tools: &'a ToolRegistry,
    max_steps: usize,
}

impl<'a, C: AiClient> AgentRunner<'a, C> {
    pub fn new(client: &'a C, tools: &'a ToolRegistry) -> Self {
        Self {
            client,
            tools,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Run `agent` on `task` until it answers without calling tools.
    pub fn run(&self, agent: &AgentConfig, task: &str) -> Result<String> {
        let (tools, routes) = self.collect_tools(agent)?;

        let mut messages = Vec::new();
        if !agent.instruction.trim().is_empty() {
            messages.push(json!({ "role": "system", "content": agent.instruction }));
        }
        messages.push(json!({ "role": "user", "content": task }));

        for step in 0..self.max_steps {
            log::agent_step(&agent.name, step + 1);

            let request = ChatRequest::new(agent.model.clone(), messages.clone()).with_tools(tools.clone());
            let response = self
                .client
                .chat(request)
                .with_context(|| format!("chat request for agent '{}' failed", agent.name))?;

            let msg = response
                .choices
                .into_iter()
                .next()
                .context("no choices in chat response")?
                .message;

            let tool_calls = msg.tool_calls.clone().unwrap_or_default();
            if !tool_calls.is_empty() {
                if let Some(ref content) = msg.content {
                    if !content.trim().is_empty() {
                        log::agent_message(&agent.name, content);
                    }
                }

                messages.push(json!({
                    "role": "assistant",
                    "content": msg.content,
                    "tool_calls": tool_calls.iter().map(|tc| {
                        json!({
                            "id": tc.id,
                            "type": tc.call_type,
                            "function": {
                                "name": tc.function.name,
                                "arguments": tc.function.arguments,
                            }
                        })
                    }).collect::<Vec<_>>()
                }));

                for tc in &tool_calls {
                    log::tool_call(&agent.name, &tc.function.name, &tc.function.arguments);
                    let result = self.handle_tool_call(agent, &routes, tc);
                    if result.starts_with("ERROR") {
                        log::tool_error(&agent.name, &result);
                    } else {
                        log::tool_success(&agent.name, &result);
                    }
                    messages.push(json!({
                        "role": "tool",
                        "tool_call_id": tc.id,
                        "name": tc.function.name,
                        "content": result,
                    }));
                }

                continue;
            }

            let content = msg.content.unwrap_or_else(|| "<no content>".to_string());
            log::agent_done(&agent.name, &content);
            return Ok(content);
        }

        bail!(
            "agent '{}' reached max_steps ({}) without a final answer",
            agent.name,
            self.max_steps
        )
    }

    /// Tool definitions for the model plus a route for each provider tool.
    /// When two providers expose the same name, the first one wins.
    fn collect_tools(&self, agent: &AgentConfig) -> Result<(Vec<Value>, Routes<'a>)> {
        let mut definitions = Vec::new();
        let mut routes: Routes<'a> = HashMap::new();

        for provider in self.tools.providers(&agent.name) {
            let specs = provider
                .list_tools()
                .with_context(|| format!("failed to list tools from {}", provider.name()))?;
            for spec in specs {
                if routes.contains_key(&spec.name) {
                    tracing::warn!(
                        agent = %agent.name,
                        tool = %spec.name,
                        provider = provider.name(),
                        "duplicate tool name ignored"
                    );
                    continue;
                }
                definitions.push(spec.to_chat_tool());
                routes.insert(spec.name, &**provider);
            }
        }

        for sub_agent in &agent.sub_agents {
            definitions.push(tool_defs::transfer_tool_definition(sub_agent));
        }

        Ok((definitions, routes))
    }

    /// Every failure becomes an `ERROR: ...` tool result for the model.
    fn handle_tool_call(&self, agent: &AgentConfig, routes: &Routes<'a>, tc: &ChatToolCall) -> String {
        let name = tc.function.name.as_str();

        let args = match parse_arguments(&tc.function.arguments) {
            Ok(args) => args,
            Err(e) => return format!("ERROR: {:#}", e),
        };

        if let Some(target) = name.strip_prefix(TRANSFER_PREFIX) {
            if let Some(sub_agent) = agent.sub_agents.iter().find(|a| a.name == target) {
                return self.delegate(agent, sub_agent, &args);
            }
        }

        match routes.get(name) {
            Some(provider) => match provider.call_tool(name, args) {
                Ok(output) => output.to_message_content(),
                Err(e) => format!("ERROR: {:#}", e),
            },
            None => format!("ERROR: Unknown tool: {}", name),
        }
    }

    fn delegate(&self, agent: &AgentConfig, sub_agent: &AgentConfig, args: &Value) -> String {
        let Some(request) = args.get("request").and_then(Value::as_str) else {
            return format!(
                "ERROR: {} requires a 'request' string",
                transfer_tool_name(&sub_agent.name)
            );
        };

        log::delegate(&agent.name, &sub_agent.name, request);
        match self.run(sub_agent, request) {
            Ok(answer) => answer,
            Err(e) => format!("ERROR: agent '{}' failed: {:#}", sub_agent.name, e),
        }
    }
}

/// Tool arguments as a JSON object. Empty or `null` means no arguments.
fn parse_arguments(raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(json!({}));
    }
    let value: Value = serde_json::from_str(raw).context("tool arguments are not valid JSON")?;
    match value {
        Value::Null => Ok(json!({})),
        Value::Object(_) => Ok(value),
        other => bail!("tool arguments must be a JSON object, got {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use arogyam_core::ai_client::{ChatChoice, ChatMessage, ChatResponse, ChatToolFunction};
    use arogyam_core::tool_provider::{ToolOutput, ToolSpec};

    struct ScriptedClient {
        replies: Mutex<VecDeque<ChatResponse>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<ChatResponse>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl AiClient for ScriptedClient {
        fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
            self.requests.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .context("script exhausted")
        }
    }

    struct MockProvider {
        label: String,
        tools: Vec<&'static str>,
        calls: Mutex<Vec<(String, Value)>>,
    }

    impl MockProvider {
        fn new(label: &str, tools: Vec<&'static str>) -> Self {
            Self {
                label: label.to_string(),
                tools,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl ToolProvider for MockProvider {
        fn name(&self) -> &str {
            &self.label
        }

        fn list_tools(&self) -> Result<Vec<ToolSpec>> {
            Ok(self
                .tools
                .iter()
                .map(|t| ToolSpec {
                    name: t.to_string(),
                    description: format!("{} from {}", t, self.label),
                    input_schema: json!({ "type": "object", "properties": {} }),
                })
                .collect())
        }

        fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolOutput> {
            self.calls.lock().unwrap().push((name.to_string(), arguments.clone()));
            match arguments.get("month").and_then(Value::as_i64) {
                Some(m) if !(1..=12).contains(&m) => Ok(ToolOutput::error(json!({
                    "error": format!("Invalid month: {}. Month must be between 1 and 12.", m)
                }))),
                _ => Ok(ToolOutput::ok(json!({ "summary": { "highest_surge_month": "November" } }))),
            }
        }
    }

    struct FailingProvider;

    impl ToolProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn list_tools(&self) -> Result<Vec<ToolSpec>> {
            anyhow::bail!("failed to spawn tool process 'missing'")
        }

        fn call_tool(&self, _name: &str, _arguments: Value) -> Result<ToolOutput> {
            unreachable!()
        }
    }

    fn answer(text: &str) -> ChatResponse {
        ChatResponse {
            choices: vec![ChatChoice {
                message: ChatMessage {
                    role: "assistant".into(),
                    content: Some(text.into()),
                    tool_calls: None,
                },
            }],
        }
    }

    fn call(id: &str, name: &str, arguments: &str) -> ChatResponse {
        ChatResponse {
            choices: vec![ChatChoice {
                message: ChatMessage {
                    role: "assistant".into(),
                    content: None,
                    tool_calls: Some(vec![ChatToolCall {
                        id: id.into(),
                        call_type: "function".into(),
                        function: ChatToolFunction {
                            name: name.into(),
                            arguments: arguments.into(),
                        },
                    }]),
                },
            }],
        }
    }

    fn last_tool_result(request: &ChatRequest) -> String {
        let msg = request.messages.last().unwrap();
        assert_eq!(msg["role"], "tool");
        msg["content"].as_str().unwrap().to_string()
    }

    fn analyst() -> AgentConfig {
        AgentConfig::new("analyst", "test-model")
            .with_description("Answers questions about past surges.")
            .with_instruction("You analyse surge history.")
    }

    #[test]
    fn test_plain_answer() {
        let client = ScriptedClient::new(vec![answer("Hello")]);
        let registry = ToolRegistry::empty();
        let runner = AgentRunner::new(&client, &registry);

        let out = runner.run(&analyst(), "hi").unwrap();
        assert_eq!(out, "Hello");

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "test-model");
        assert!(requests[0].tools.is_empty());
        assert_eq!(requests[0].messages[0]["role"], "system");
        assert_eq!(requests[0].messages[1]["content"], "hi");
    }

    #[test]
    fn test_tool_result_is_fed_back() {
        let client = ScriptedClient::new(vec![
            call("c1", "get_historical_surge_data", r#"{"month": 11}"#),
            answer("November is the peak."),
        ]);
        let registry = ToolRegistry::empty().with_provider(
            "analyst",
            MockProvider::new("mock", vec!["get_historical_surge_data"]),
        );
        let runner = AgentRunner::new(&client, &registry);

        let out = runner.run(&analyst(), "When is the peak?").unwrap();
        assert_eq!(out, "November is the peak.");

        let requests = client.requests();
        assert_eq!(requests[0].tools.len(), 1);
        assert_eq!(requests[0].tool_choice.as_deref(), Some("auto"));
        let result: Value = serde_json::from_str(&last_tool_result(&requests[1])).unwrap();
        assert_eq!(result["summary"]["highest_surge_month"], "November");
    }

    #[test]
    fn test_tool_error_is_reported_not_raised() {
        let client = ScriptedClient::new(vec![
            call("c1", "get_historical_surge_data", r#"{"month": 13}"#),
            answer("That month does not exist."),
        ]);
        let registry = ToolRegistry::empty().with_provider(
            "analyst",
            MockProvider::new("mock", vec!["get_historical_surge_data"]),
        );
        let runner = AgentRunner::new(&client, &registry);

        runner.run(&analyst(), "month 13?").unwrap();
        let result = last_tool_result(&client.requests()[1]);
        assert!(result.starts_with("ERROR: "));
        assert!(result.contains("Invalid month: 13"));
    }

    #[test]
    fn test_unknown_tool_and_bad_arguments() {
        let client = ScriptedClient::new(vec![
            call("c1", "drop_tables", "{}"),
            call("c2", "get_historical_surge_data", "{not json"),
            answer("done"),
        ]);
        let registry = ToolRegistry::empty().with_provider(
            "analyst",
            MockProvider::new("mock", vec!["get_historical_surge_data"]),
        );
        let runner = AgentRunner::new(&client, &registry);

        runner.run(&analyst(), "x").unwrap();
        let requests = client.requests();
        assert_eq!(last_tool_result(&requests[1]), "ERROR: Unknown tool: drop_tables");
        assert!(last_tool_result(&requests[2]).contains("not valid JSON"));
    }

    #[test]
    fn test_transfer_runs_sub_agent() {
        let root = AgentConfig::new("coordinator", "test-model")
            .with_instruction("Coordinate.")
            .with_sub_agent(analyst());
        let client = ScriptedClient::new(vec![
            call("c1", "transfer_to_analyst", r#"{"request": "Which months were critical?"}"#),
            answer("May and November."),
            answer("Plan for May and November."),
        ]);
        let registry = ToolRegistry::empty();
        let runner = AgentRunner::new(&client, &registry);

        let out = runner.run(&root, "Plan staffing").unwrap();
        assert_eq!(out, "Plan for May and November.");

        let requests = client.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].tools[0]["function"]["name"], "transfer_to_analyst");
        assert_eq!(requests[1].messages[0]["content"], "You analyse surge history.");
        assert_eq!(requests[1].messages[1]["content"], "Which months were critical?");
        assert_eq!(last_tool_result(&requests[2]), "May and November.");
    }

    #[test]
    fn test_transfer_without_request() {
        let root = AgentConfig::new("coordinator", "test-model").with_sub_agent(analyst());
        let client = ScriptedClient::new(vec![call("c1", "transfer_to_analyst", "{}"), answer("ok")]);
        let registry = ToolRegistry::empty();
        let runner = AgentRunner::new(&client, &registry);

        runner.run(&root, "x").unwrap();
        assert!(last_tool_result(&client.requests()[1]).contains("requires a 'request' string"));
    }

    #[test]
    fn test_duplicate_tool_names_first_wins() {
        let first = MockProvider::new("first", vec!["get_historical_surge_data"]);
        let second = MockProvider::new("second", vec!["get_historical_surge_data", "ping"]);
        let registry = ToolRegistry::empty()
            .with_provider("analyst", first)
            .with_provider("analyst", second);
        let client = ScriptedClient::new(vec![answer("ok")]);
        let runner = AgentRunner::new(&client, &registry);

        runner.run(&analyst(), "x").unwrap();
        let tools = &client.requests()[0].tools;
        assert_eq!(tools.len(), 2);
        assert_eq!(
            tools[0]["function"]["description"],
            "get_historical_surge_data from first"
        );
    }

    #[test]
    fn test_max_steps_exceeded() {
        let client = ScriptedClient::new(vec![
            call("c1", "get_historical_surge_data", "{}"),
            call("c2", "get_historical_surge_data", "{}"),
        ]);
        let registry = ToolRegistry::empty().with_provider(
            "analyst",
            MockProvider::new("mock", vec!["get_historical_surge_data"]),
        );
        let runner = AgentRunner::new(&client, &registry).with_max_steps(2);

        let err = runner.run(&analyst(), "loop").unwrap_err();
        assert!(err.to_string().contains("max_steps"));
    }

    #[test]
    fn test_provider_listing_failure_is_an_error() {
        let registry = ToolRegistry::empty().with_provider("analyst", FailingProvider);
        let client = ScriptedClient::new(vec![]);
        let runner = AgentRunner::new(&client, &registry);

        let err = runner.run(&analyst(), "x").unwrap_err();
        assert!(format!("{:#}", err).contains("failed to list tools from failing"));
        assert!(client.requests().is_empty());
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(parse_arguments("").unwrap(), json!({}));
        assert_eq!(parse_arguments("null").unwrap(), json!({}));
        assert_eq!(parse_arguments(r#"{"month":3}"#).unwrap()["month"], 3);
        assert!(parse_arguments("[1]").is_err());
    }
}
