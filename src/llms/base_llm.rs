//! Base completion-client trait.
//!
//! Provides the trait every chat-completion backend implements, the request
//! type the persona agents build, and the shared provider state.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prompts::RenderedPrompt;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Model used for every persona call unless configured otherwise.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Sampling temperature for persona calls.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

// ---------------------------------------------------------------------------
// Messages and requests
// ---------------------------------------------------------------------------

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

/// A single message in an LLM conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LLMMessage {
    pub role: MessageRole,
    pub content: String,
}

impl LLMMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// One completion call: the conversation plus its token budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub messages: Vec<LLMMessage>,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// System instruction followed by the fixed user instruction.
    pub fn from_prompt(prompt: &RenderedPrompt) -> Self {
        Self {
            messages: vec![
                LLMMessage::system(prompt.system.clone()),
                LLMMessage::user(prompt.user.clone()),
            ],
            max_tokens: prompt.kind.max_tokens(),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures of a single completion call.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key was configured for the provider.
    #[error("{provider} API key not set")]
    MissingApiKey { provider: String },

    /// The request could not be sent or the body could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("{provider} API error ({status}): {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    /// The provider answered 2xx but the payload had no usable content.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

// ---------------------------------------------------------------------------
// BaseLLM trait
// ---------------------------------------------------------------------------

/// A chat-completion backend.
///
/// Implementations make exactly one upstream call per [`BaseLLM::acall`]; no
/// retries. Callers are expected to absorb errors.
#[async_trait]
pub trait BaseLLM: Send + Sync + fmt::Debug {
    /// Get the model identifier/name.
    fn model(&self) -> &str;

    /// Get the provider name.
    fn provider(&self) -> &str {
        "openai"
    }

    /// Send the request and return the raw text of the first choice.
    async fn acall(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// BaseLLMState - shared state for LLM implementations
// ---------------------------------------------------------------------------

/// Shared configuration for LLM implementations.
#[derive(Clone, Serialize, Deserialize)]
pub struct BaseLLMState {
    /// The model identifier/name.
    pub model: String,
    /// Optional temperature setting for response generation.
    pub temperature: Option<f64>,
    /// Optional API key.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Optional base URL for the API.
    pub base_url: Option<String>,
    /// Provider name (e.g., "openai").
    pub provider: String,
}

impl BaseLLMState {
    /// Create a new `BaseLLMState` with the given model name.
    ///
    /// # Panics
    ///
    /// Panics if `model` is empty.
    pub fn new(model: impl Into<String>) -> Self {
        let model = model.into();
        assert!(!model.is_empty(), "Model name is required and cannot be empty");

        Self {
            model,
            temperature: Some(DEFAULT_TEMPERATURE),
            api_key: None,
            base_url: None,
            provider: "openai".to_string(),
        }
    }
}

impl fmt::Debug for BaseLLMState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseLLMState")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("provider", &self.provider)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::store::bundled_store;
    use crate::persona::PersonaId;
    use crate::prompts::{render_document_prompt, DOCUMENT_USER_INSTRUCTION};

    #[test]
    fn test_request_from_prompt() {
        let store = bundled_store();
        let prompt = render_document_prompt(store.get(PersonaId::Putin), "memo");
        let request = CompletionRequest::from_prompt(&prompt);

        assert_eq!(request.max_tokens, 600);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert_eq!(request.messages[0].content, prompt.system);
        assert_eq!(request.messages[1], LLMMessage::user(DOCUMENT_USER_INSTRUCTION));
    }

    #[test]
    fn test_message_serializes_openai_shape() {
        let json = serde_json::to_value(LLMMessage::system("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "system", "content": "hi"}));
    }

    #[test]
    fn test_state_debug_redacts_key() {
        let mut state = BaseLLMState::new("gpt-4o-mini");
        state.api_key = Some("sk-secret".into());
        let debug = format!("{:?}", state);
        assert!(!debug.contains("sk-secret"));
        assert_eq!(state.temperature, Some(DEFAULT_TEMPERATURE));
    }
}
