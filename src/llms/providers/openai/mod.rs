//! OpenAI chat-completions provider.
//!
//! Sends one `POST {base_url}/chat/completions` per call via `reqwest` and
//! returns the text content of the first choice. Calls are never retried.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::llms::base_llm::{BaseLLM, BaseLLMState, CompletionRequest, LlmError};

/// Default API base URL.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// OpenAI native completion implementation.
///
/// # Example
///
/// ```ignore
/// let provider = OpenAICompletion::new("gpt-4o-mini", Some(key), None, Duration::from_secs(120))?;
/// let reply = provider.acall(&request).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OpenAICompletion {
    /// Shared base LLM state.
    pub state: BaseLLMState,
    client: reqwest::Client,
}

impl OpenAICompletion {
    /// Create a new OpenAI completion provider.
    ///
    /// # Arguments
    ///
    /// * `model` - OpenAI model name (e.g., "gpt-4o-mini").
    /// * `api_key` - API key; calls fail with [`LlmError::MissingApiKey`] without one.
    /// * `base_url` - Optional custom base URL.
    /// * `timeout` - Per-request timeout.
    pub fn new(
        model: impl Into<String>,
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let mut state = BaseLLMState::new(model);
        state.api_key = api_key;
        state.base_url = base_url;
        state.provider = "openai".to_string();

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { state, client })
    }

    /// Get the API base URL.
    pub fn api_base_url(&self) -> &str {
        self.state
            .base_url
            .as_deref()
            .unwrap_or(OPENAI_BASE_URL)
            .trim_end_matches('/')
    }

    /// Build the request body for the Chat Completions API.
    pub fn build_request_body(&self, request: &CompletionRequest) -> Value {
        let mut body = serde_json::json!({
            "model": self.state.model,
            "messages": request.messages,
            "max_tokens": request.max_tokens,
        });

        if let Some(temp) = self.state.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        body
    }

    /// Parse a Chat Completions API response into the first choice's text.
    pub fn parse_completions_response(&self, response: &Value) -> Result<String, LlmError> {
        let message = response
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .ok_or_else(|| LlmError::InvalidResponse("no choices in OpenAI response".into()))?;

        let content = message
            .get("content")
            .and_then(|c| c.as_str())
            .ok_or_else(|| LlmError::InvalidResponse("no text content in OpenAI choice".into()))?;

        if let Some(usage) = response.get("usage") {
            tracing::debug!(
                prompt_tokens = usage.get("prompt_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
                completion_tokens = usage.get("completion_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
                total_tokens = usage.get("total_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
                "OpenAI token usage"
            );
        }

        Ok(content.to_string())
    }
}

#[async_trait]
impl BaseLLM for OpenAICompletion {
    fn model(&self) -> &str {
        &self.state.model
    }

    fn provider(&self) -> &str {
        &self.state.provider
    }

    async fn acall(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        tracing::debug!(
            model = %self.state.model,
            messages = request.messages.len(),
            max_tokens = request.max_tokens,
            "OpenAICompletion.acall"
        );

        let api_key = self
            .state
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LlmError::MissingApiKey {
                provider: "OpenAI".into(),
            })?;

        let endpoint = format!("{}/chat/completions", self.api_base_url());
        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(api_key)
            .json(&self.build_request_body(request))
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Status {
                provider: "OpenAI".into(),
                status: status.as_u16(),
                body: truncate_chars(&response_text, 500),
            });
        }

        let response_json: Value = serde_json::from_str(&response_text).map_err(|e| {
            LlmError::InvalidResponse(format!(
                "failed to parse OpenAI response: {} - Body: {}",
                e,
                truncate_chars(&response_text, 500)
            ))
        })?;

        self.parse_completions_response(&response_json)
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
