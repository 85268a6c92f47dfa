//! Live adapter for the `LlmClient` port using the Anthropic messages API.

use std::env;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::PortError;
use crate::ports::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmFuture};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// LLM client that calls the Anthropic messages API.
///
/// Reads `ANTHROPIC_API_KEY` on every call so a missing key only fails the
/// units that try to use it.
pub struct AnthropicLlmClient {
    client: Client,
}

impl AnthropicLlmClient {
    /// Creates a new client.
    #[must_use]
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for AnthropicLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl LlmClient for AnthropicLlmClient {
    fn complete(&self, request: &CompletionRequest) -> LlmFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let api_key = env::var("ANTHROPIC_API_KEY")
                .map_err(|_| PortError::from("ANTHROPIC_API_KEY environment variable not set"))?;

            let body = MessagesRequest {
                model: &request.model,
                max_tokens: request.max_tokens,
                messages: [Message {
                    role: "user",
                    content: &request.prompt,
                }],
            };

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
                .send()
                .await
                .map_err(|e| format!("Anthropic API request failed: {e}"))?;

            let status = response.status();
            let response_text = response
                .text()
                .await
                .map_err(|e| format!("failed to read Anthropic API response: {e}"))?;

            if !status.is_success() {
                let msg = serde_json::from_str::<ApiError>(&response_text)
                    .map(|e| e.error.message)
                    .unwrap_or(response_text);
                return Err(format!("Anthropic API error ({}): {msg}", status.as_u16()).into());
            }

            let parsed: MessagesResponse = serde_json::from_str(&response_text)
                .map_err(|e| format!("failed to parse Anthropic API response: {e}"))?;

            Ok(CompletionResponse {
                text: parsed.content.into_iter().map(|block| block.text).collect(),
            })
        })
    }
}
