//! Response envelopes returned by the task endpoints.

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::agents::{CrisisResponse, DocumentAnalysis};
use crate::analytics::RiskLevel;
use crate::persona::PersonaId;

/// One persona's result inside an envelope, with the persona's display name
/// in front and, for crisis tasks, a personality note after.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentEntry<T> {
    pub name: String,
    #[serde(flatten)]
    pub result: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personality_notes: Option<String>,
}

/// Crisis task envelope.
///
/// `agents` is keyed by persona identifier and always holds every configured
/// persona, including those whose call fell back.
#[derive(Debug, Clone, Serialize)]
pub struct CrisisAssessment {
    pub scenario: String,
    pub timestamp: String,
    pub agents: BTreeMap<PersonaId, AgentEntry<CrisisResponse>>,
    pub overall_risk: RiskLevel,
    pub key_insights: Vec<String>,
    pub bluf: String,
}

/// Document task envelope. Carries no aggregate analytics.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    /// Filename supplied by the client, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    pub timestamp: String,
    pub agents: BTreeMap<PersonaId, AgentEntry<DocumentAnalysis>>,
}

/// Current UTC time as ISO-8601 with millisecond precision, e.g.
/// `2024-05-01T12:00:00.000Z`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
