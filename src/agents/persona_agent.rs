//! A persona bound to a completion backend.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::agents::parser::{extract_structured, ParseError};
use crate::agents::result::{AgentOutput, CrisisResponse, DocumentAnalysis};
use crate::llms::base_llm::{BaseLLM, CompletionRequest, LlmError};
use crate::persona::PersonaRecord;
use crate::prompts::{render_crisis_prompt, render_document_prompt, RenderedPrompt};

/// Why a persona call fell back.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Runs tasks as one persona.
///
/// Every public method returns a well-formed result: upstream and parse
/// failures are logged and replaced by the result type's fallback.
#[derive(Debug, Clone)]
pub struct PersonaAgent {
    record: Arc<PersonaRecord>,
    llm: Arc<dyn BaseLLM>,
}

impl PersonaAgent {
    pub fn new(record: Arc<PersonaRecord>, llm: Arc<dyn BaseLLM>) -> Self {
        Self { record, llm }
    }

    /// React to a crisis scenario in character.
    pub async fn analyze_crisis(&self, crisis: &str) -> CrisisResponse {
        self.execute(render_crisis_prompt(&self.record, crisis)).await
    }

    /// Interpret a document in character.
    pub async fn analyze_document(&self, document: &str) -> DocumentAnalysis {
        self.execute(render_document_prompt(&self.record, document)).await
    }

    async fn execute<T: AgentOutput>(&self, prompt: RenderedPrompt) -> T {
        match self.try_execute::<T>(&prompt).await {
            Ok(output) => output,
            Err(error) => {
                tracing::error!(
                    persona = %self.record.id,
                    task = ?T::KIND,
                    provider = self.llm.provider(),
                    model = self.llm.model(),
                    %error,
                    "persona call failed, using fallback result"
                );
                T::fallback()
            }
        }
    }

    async fn try_execute<T: AgentOutput>(&self, prompt: &RenderedPrompt) -> Result<T, AgentError> {
        let request = CompletionRequest::from_prompt(prompt);
        let reply = self.llm.acall(&request).await?;
        let map = extract_structured(&reply)?;
        let mut output: T = serde_json::from_value(Value::Object(map)).map_err(ParseError::Shape)?;
        output.strip_reserved_keys();
        Ok(output)
    }
}
