//! LLM completion layer.
//!
//! - [`base_llm`] - The trait every completion backend implements
//! - [`providers`] - Concrete provider implementations (OpenAI)

pub mod base_llm;
pub mod providers;

// Re-exports for convenience
pub use base_llm::{
    BaseLLM, BaseLLMState, CompletionRequest, LLMMessage, LlmError, MessageRole, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE,
};
pub use providers::openai::OpenAICompletion;
