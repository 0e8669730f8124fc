//! LLM provider implementations.
//!
//! Each provider implements the [`BaseLLM`](crate::llms::base_llm::BaseLLM)
//! trait and handles authentication, request formatting and response
//! extraction for its API.
//!
//! | Provider | Module |
//! |----------|--------|
//! | OpenAI | [`openai`] |

pub mod openai;
