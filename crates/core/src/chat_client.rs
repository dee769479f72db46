// crates/core/src/chat_client.rs

//! Chat-completions client over HTTP.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;

use crate::ai_client::{AiClient, ChatRequest, ChatResponse};

/// Gemini's OpenAI-compatible base URL.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

const MAX_ATTEMPTS: u32 = 3;

/// Blocking client for any OpenAI-compatible `/chat/completions` endpoint.
///
/// Environment variables:
/// - AROGYAM_LLM_API_KEY: API key (falls back to GEMINI_API_KEY)
/// - AROGYAM_LLM_ENDPOINT: base URL, default [`DEFAULT_ENDPOINT`]
/// - AROGYAM_LLM_DEBUG: when set, request/response bodies are logged at debug level
pub struct ChatCompletionsClient {
    client: Client,
    url: String,
    api_key: String,
    debug: bool,
}

impl ChatCompletionsClient {
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            url: format!("{}/chat/completions", endpoint.trim_end_matches('/')),
            api_key: api_key.to_string(),
            debug: false,
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("AROGYAM_LLM_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .context("AROGYAM_LLM_API_KEY (or GEMINI_API_KEY) not set")?;
        let endpoint =
            std::env::var("AROGYAM_LLM_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        tracing::info!(%endpoint, "using chat completions endpoint");

        let mut client = Self::new(&endpoint, &api_key);
        client.debug = std::env::var("AROGYAM_LLM_DEBUG").is_ok();
        Ok(client)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Backoff before the next attempt, or `None` if the failure is final.
///
/// `status` is `None` for network errors. Rate limits back off 5s then 20s,
/// server and network errors 2s then 4s.
fn retry_delay(status: Option<u16>, attempt: u32) -> Option<Duration> {
    if attempt >= MAX_ATTEMPTS {
        return None;
    }
    let secs = match status {
        Some(429) => 5 * u64::from(attempt) * u64::from(attempt),
        Some(code) if code >= 500 => 2 * u64::from(attempt),
        Some(_) => return None,
        None => 2 * u64::from(attempt),
    };
    Some(Duration::from_secs(secs))
}

impl AiClient for ChatCompletionsClient {
    fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        if self.debug {
            if let Ok(json) = serde_json::to_string_pretty(&request) {
                tracing::debug!(url = %self.url, request = %truncate(&json, 2000), "chat request");
            }
        }

        let mut last_error = None;

        for attempt in 1..=MAX_ATTEMPTS {
            let resp = self
                .client
                .post(&self.url)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send();

            match resp {
                Ok(r) if r.status().is_success() => {
                    let raw_text = r.text().context("failed to read chat response body")?;
                    if self.debug {
                        tracing::debug!(response = %truncate(&raw_text, 2000), "chat response");
                    }
                    return serde_json::from_str(&raw_text)
                        .context("failed to parse chat completions response");
                }
                Ok(r) => {
                    let status = r.status();
                    let body = r.text().unwrap_or_default();
                    let Some(delay) = retry_delay(Some(status.as_u16()), attempt) else {
                        anyhow::bail!("chat request failed: HTTP {} - {}", status, body);
                    };
                    tracing::warn!(
                        attempt,
                        %status,
                        delay_secs = delay.as_secs(),
                        body = %truncate(&body, 500),
                        "chat request failed, retrying"
                    );
                    last_error = Some(anyhow::anyhow!("HTTP {} - {}", status, body));
                    std::thread::sleep(delay);
                }
                Err(e) => {
                    let Some(delay) = retry_delay(None, attempt) else {
                        return Err(e).context("chat request failed after retries");
                    };
                    tracing::warn!(attempt, error = %e, "network error, retrying");
                    last_error = Some(anyhow::anyhow!("network error: {}", e));
                    std::thread::sleep(delay);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("chat request failed after retries")))
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
