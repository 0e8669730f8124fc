//! # AdversaryIQ
//!
//! Multi-persona crisis analysis service.
//!
//! A crisis scenario or a diplomatic document is sent, concurrently, to one
//! chat-completion call per configured leader persona. Each call is framed by
//! a prompt rendered from that persona's static psychological profile and
//! belief set. The replies are normalized into typed results and collected
//! into a single envelope. For crises the envelope also carries an overall
//! risk level, key insights and a bottom-line-up-front summary. Persona
//! replies can be voiced through a text-to-speech backend.
//!
//! - [`persona`] - Persona identifiers, profile data and the startup store
//! - [`prompts`] - Prompt rendering per persona and task
//! - [`llms`] - Completion backends
//! - [`agents`] - A persona bound to a backend, with reply parsing and fallbacks
//! - [`analytics`] - Overall risk, key insights, BLUF
//! - [`orchestrator`] - Concurrent fan-out and envelope assembly
//! - [`speech`] - Text-to-speech backends
//! - [`config`] - Environment configuration
//! - [`server`] - HTTP surface

pub mod agents;
pub mod analytics;
pub mod config;
pub mod llms;
pub mod orchestrator;
pub mod persona;
pub mod prompts;
pub mod server;
pub mod speech;

pub use agents::{CrisisResponse, DocumentAnalysis, PersonaAgent};
pub use analytics::RiskLevel;
pub use config::AppConfig;
pub use llms::base_llm::BaseLLM;
pub use orchestrator::{CrisisAssessment, DocumentReport, Orchestrator};
pub use persona::{PersonaId, PersonaStore};
pub use speech::SpeechSynthesizer;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
