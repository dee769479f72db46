// crates/host/src/agents/log.rs

//! Structured logging for agent runs.

/// Log the start of an agent step.
pub fn agent_step(agent: &str, step: usize) {
    tracing::info!(agent, step, "agent step");
}

/// Log agent message/thought
pub fn agent_message(agent: &str, message: &str) {
    tracing::info!(agent, message = %truncate_message(message, 500), "agent says");
}

pub fn tool_call(agent: &str, tool_name: &str, args_summary: &str) {
    tracing::info!(agent, tool = tool_name, args = %truncate_message(args_summary, 100), "tool call");
}

pub fn tool_success(agent: &str, result: &str) {
    tracing::info!(agent, result = %truncate_message(result, 200), "tool ok");
}

/// Errors keep more of the output than successes.
pub fn tool_error(agent: &str, error: &str) {
    tracing::warn!(agent, error = %truncate_message(error, 1000), "tool error");
}

pub fn delegate(agent: &str, sub_agent: &str, request: &str) {
    tracing::info!(agent, sub_agent, request = %truncate_message(request, 200), "delegating");
}

pub fn agent_done(agent: &str, answer: &str) {
    tracing::info!(agent, answer = %truncate_message(answer, 100), "agent finished");
}

/// First line of `msg`, cut to `max_chars`, noting how many lines were dropped.
pub fn truncate_message(msg: &str, max_chars: usize) -> String {
    let msg = msg.trim();
    let first_line = msg.lines().next().unwrap_or(msg);
    let extra_lines = msg.lines().count().saturating_sub(1);

    if let Some((idx, _)) = first_line.char_indices().nth(max_chars) {
        format!("{}...", &first_line[..idx])
    } else if extra_lines > 0 {
        format!("{} [+{} lines]", first_line, extra_lines)
    } else {
        first_line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_message() {
        assert_eq!(truncate_message("  short  ", 10), "short");
        assert_eq!(truncate_message("abcdefgh", 3), "abc...");
        assert_eq!(truncate_message("one\ntwo\nthree", 10), "one [+2 lines]");
    }

    #[test]
    fn test_truncate_message_multibyte() {
        assert_eq!(truncate_message("दिवाली surge", 3), "दिव...");
    }
}
