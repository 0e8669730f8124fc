//! Fan-out orchestration.
//!
//! One task is dispatched to every configured persona at once; the
//! orchestrator waits for all of them and assembles the envelope. Individual
//! persona failures never reach this level (agents fall back), so the only
//! errors are rejected input and panicked agent tasks.

pub mod envelope;

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use thiserror::Error;
use tokio::task::JoinError;

use crate::agents::{CrisisResponse, PersonaAgent};
use crate::analytics::{generate_bluf, key_insights, overall_risk_of};
use crate::llms::base_llm::BaseLLM;
use crate::persona::{PersonaId, PersonaStore};

pub use envelope::{timestamp_now, AgentEntry, CrisisAssessment, DocumentReport};

#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Required task text was absent or empty.
    #[error("{0} is required")]
    MissingInput(&'static str),

    #[error("agent task for {persona} panicked: {source}")]
    AgentPanicked {
        persona: PersonaId,
        #[source]
        source: JoinError,
    },
}

/// Runs tasks across all personas against one completion backend.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    personas: Arc<PersonaStore>,
    llm: Arc<dyn BaseLLM>,
}

impl Orchestrator {
    pub fn new(personas: Arc<PersonaStore>, llm: Arc<dyn BaseLLM>) -> Self {
        Self { personas, llm }
    }

    /// Analyze a crisis scenario with every persona and aggregate the results.
    pub async fn process_crisis(&self, crisis: &str) -> Result<CrisisAssessment, OrchestratorError> {
        if crisis.is_empty() {
            return Err(OrchestratorError::MissingInput("crisis"));
        }
        tracing::info!(chars = crisis.chars().count(), "processing crisis");

        let scenario: Arc<str> = Arc::from(crisis);
        let results = self
            .fan_out(move |agent| {
                let scenario = Arc::clone(&scenario);
                async move { agent.analyze_crisis(&scenario).await }
            })
            .await?;

        let refs: Vec<(PersonaId, &CrisisResponse)> = results.iter().map(|(id, r)| (*id, r)).collect();
        let overall_risk = overall_risk_of(&refs);
        let key_insights = key_insights(&refs);
        let bluf = generate_bluf(&refs, crisis);

        let agents = results
            .into_iter()
            .map(|(id, result)| {
                let record = self.personas.get(id);
                let entry = AgentEntry {
                    name: record.display_name().to_string(),
                    result,
                    personality_notes: Some(record.personality_note()),
                };
                (id, entry)
            })
            .collect();

        Ok(CrisisAssessment {
            scenario: crisis.to_string(),
            timestamp: timestamp_now(),
            agents,
            overall_risk,
            key_insights,
            bluf,
        })
    }

    /// Interpret a document with every persona.
    pub async fn analyze_document(
        &self,
        text: &str,
        filename: Option<&str>,
    ) -> Result<DocumentReport, OrchestratorError> {
        if text.is_empty() {
            return Err(OrchestratorError::MissingInput("documentText"));
        }
        tracing::info!(filename = filename.unwrap_or("<unnamed>"), "analyzing document");

        let document: Arc<str> = Arc::from(text);
        let results = self
            .fan_out(move |agent| {
                let document = Arc::clone(&document);
                async move { agent.analyze_document(&document).await }
            })
            .await?;

        let agents: BTreeMap<_, _> = results
            .into_iter()
            .map(|(id, result)| {
                let entry = AgentEntry {
                    name: id.descriptor().display_name.to_string(),
                    result,
                    personality_notes: None,
                };
                (id, entry)
            })
            .collect();

        Ok(DocumentReport {
            document: filename.map(str::to_string),
            timestamp: timestamp_now(),
            agents,
        })
    }

    /// Spawn `task` once per persona and wait for all of them, preserving
    /// persona order.
    async fn fan_out<T, F, Fut>(&self, task: F) -> Result<Vec<(PersonaId, T)>, OrchestratorError>
    where
        F: Fn(PersonaAgent) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (ids, handles): (Vec<_>, Vec<_>) = self
            .personas
            .iter()
            .map(|record| {
                let agent = PersonaAgent::new(Arc::clone(record), Arc::clone(&self.llm));
                (record.id, tokio::spawn(task(agent)))
            })
            .unzip();

        ids.into_iter()
            .zip(join_all(handles).await)
            .map(|(persona, joined)| {
                joined
                    .map(|result| (persona, result))
                    .map_err(|source| OrchestratorError::AgentPanicked { persona, source })
            })
            .collect()
    }
}
