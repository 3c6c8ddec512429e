use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use super::prompts::GenerationRequest;
use super::schema::{output_schema, GeneratedBatch, TOOL_NAME};
use super::{CardGenerator, GenerationError};
use crate::config::{api_key_from_env, ConfigError, GenerationSettings};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Card generator backed by the Anthropic Messages API
pub struct AnthropicGenerator {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    ToolUse { name: String, input: Value },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl AnthropicGenerator {
    /// Create a generator with an explicit API key
    pub fn new(settings: &GenerationSettings, api_key: String) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
        })
    }

    /// Create a generator using `ANTHROPIC_API_KEY`
    ///
    /// A missing key is a configuration error; callers treat it as fatal.
    pub fn from_env(settings: &GenerationSettings) -> Result<Self, ConfigError> {
        let api_key = api_key_from_env()?;
        Self::new(settings, api_key)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn request_body(&self, request: &GenerationRequest) -> Value {
        build_request_body(&self.model, self.max_tokens, request)
    }
}

#[async_trait]
impl CardGenerator for AnthropicGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedBatch, GenerationError> {
        log::info!(
            "Requesting {} cards ({} mode) from {}",
            request.count,
            request.mode.label(),
            self.model
        );

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.request_body(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(GenerationError::AuthFailed);
            }
            status if !status.is_success() => {
                return Err(GenerationError::Api {
                    status: status.as_u16(),
                    message: api_error_message(&body),
                });
            }
            _ => {}
        }

        let batch = parse_response(&body)?;
        log::info!("Received {} generated cards", batch.cards.len());
        Ok(batch)
    }
}

/// Build the Messages API request with a forced tool call for structured output
pub fn build_request_body(model: &str, max_tokens: u32, request: &GenerationRequest) -> Value {
    json!({
        "model": model,
        "max_tokens": max_tokens,
        "system": request.system_prompt(),
        "messages": [
            { "role": "user", "content": request.user_prompt() }
        ],
        "tools": [{
            "name": TOOL_NAME,
            "description": "Record the generated flashcards and the reasoning behind them.",
            "input_schema": output_schema(),
        }],
        "tool_choice": { "type": "tool", "name": TOOL_NAME },
    })
}

/// Extract the flashcard batch from a successful Messages API response body
pub fn parse_response(body: &str) -> Result<GeneratedBatch, GenerationError> {
    let response: MessagesResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::Schema(e.to_string()))?;

    let mut text_parts = Vec::new();
    for block in response.content {
        match block {
            ContentBlock::ToolUse { name, input } if name == TOOL_NAME => {
                return GeneratedBatch::from_tool_input(input);
            }
            ContentBlock::Text { text } => text_parts.push(text),
            _ => {}
        }
    }

    log::warn!(
        "Response had no {} tool call (stop reason: {:?})",
        TOOL_NAME,
        response.stop_reason
    );
    Err(GenerationError::Schema(format!(
        "model did not return structured cards{}",
        if text_parts.is_empty() {
            String::new()
        } else {
            format!(": {}", text_parts.join(" "))
        }
    )))
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
