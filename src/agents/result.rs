//! Per-persona result shapes and their fixed fallbacks.
//!
//! Results are flat mappings: the named fields the prompts ask for, plus any
//! extra keys the model chose to add, kept verbatim. Field values may arrive
//! as strings, numbers, booleans, or lists of those; they are normalized to
//! text. A field the model omitted stays absent in the serialized output.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::prompts::TaskKind;

/// Keys owned by the response envelope; dropped from model output so they
/// cannot collide with envelope fields.
const RESERVED_KEYS: [&str; 2] = ["name", "personality_notes"];

/// A result type a persona agent can produce.
pub trait AgentOutput: Serialize + DeserializeOwned + Send + 'static {
    /// The task this output answers.
    const KIND: TaskKind;

    /// The static result used when the completion call fails.
    fn fallback() -> Self;

    /// Extra keys carried through from the model reply.
    fn extra_mut(&mut self) -> &mut Map<String, Value>;

    fn strip_reserved_keys(&mut self) {
        let extra = self.extra_mut();
        for key in RESERVED_KEYS {
            extra.remove(key);
        }
    }
}

// ---------------------------------------------------------------------------
// Crisis
// ---------------------------------------------------------------------------

/// One persona's reaction to a crisis scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrisisResponse {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub public_response: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub private_actions: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub psychological_reasoning: Option<String>,
    /// `Low`, `Medium`, `High`, or whatever label the model produced.
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub escalation_risk: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub escalation_phase: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub belief_impact: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AgentOutput for CrisisResponse {
    const KIND: TaskKind = TaskKind::Crisis;

    fn fallback() -> Self {
        Self {
            public_response: Some("Processing error occurred".into()),
            private_actions: Some("System unavailable".into()),
            psychological_reasoning: Some("Unable to process through personality matrix".into()),
            escalation_risk: Some("Unknown".into()),
            timeline: Some("System error".into()),
            escalation_phase: Some("Error".into()),
            belief_impact: Some("Unable to calculate".into()),
            extra: Map::new(),
        }
    }

    fn extra_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extra
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// One persona's reading of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub document_interpretation: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub hidden_intentions: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub psychological_tactics: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub your_response: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub authenticity_assessment: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AgentOutput for DocumentAnalysis {
    const KIND: TaskKind = TaskKind::Document;

    fn fallback() -> Self {
        Self {
            document_interpretation: Some("Unable to analyze document".into()),
            hidden_intentions: Some("Analysis failed".into()),
            psychological_tactics: Some("Could not identify tactics".into()),
            your_response: Some("System error prevented analysis".into()),
            authenticity_assessment: Some("Unable to assess".into()),
            extra: Map::new(),
        }
    }

    fn extra_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extra
    }
}

// ---------------------------------------------------------------------------
// Field normalization
// ---------------------------------------------------------------------------

/// Accept a scalar or a list of scalars as text. Lists are joined with `"; "`.
/// Nested objects are rejected.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_text(&value).map_err(serde::de::Error::custom)
}

fn value_to_text(value: &Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(items) => {
            let parts = items
                .iter()
                .map(|item| match item {
                    Value::Array(_) | Value::Object(_) => {
                        Err("nested list or object where text was expected".to_string())
                    }
                    other => Ok(value_to_text(other)?.unwrap_or_default()),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(parts.join("; ")))
        }
        Value::Object(_) => Err("object where text was expected".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crisis_response_keeps_extra_keys() {
        let r: CrisisResponse = serde_json::from_value(serde_json::json!({
            "public_response": "We stand firm.",
            "escalation_risk": "High",
            "confidence": 0.8
        }))
        .unwrap();
        assert_eq!(r.escalation_risk.as_deref(), Some("High"));
        assert_eq!(r.timeline, None);
        assert_eq!(r.extra["confidence"], 0.8);

        let out = serde_json::to_value(&r).unwrap();
        assert_eq!(out["confidence"], 0.8);
        assert!(out.get("timeline").is_none());
    }

    #[test]
    fn test_lists_and_numbers_become_text() {
        let r: CrisisResponse = serde_json::from_value(serde_json::json!({
            "private_actions": ["Call allies", "Move fleet"],
            "timeline": 48
        }))
        .unwrap();
        assert_eq!(r.private_actions.as_deref(), Some("Call allies; Move fleet"));
        assert_eq!(r.timeline.as_deref(), Some("48"));
    }

    #[test]
    fn test_nested_object_field_is_rejected() {
        let r = serde_json::from_value::<DocumentAnalysis>(serde_json::json!({
            "hidden_intentions": {"primary": "stall"}
        }));
        assert!(r.is_err());
    }

    #[test]
    fn test_strip_reserved_keys() {
        let mut r: DocumentAnalysis = serde_json::from_value(serde_json::json!({
            "name": "Someone Else",
            "your_response": "Reject it",
            "tone": "hostile"
        }))
        .unwrap();
        r.strip_reserved_keys();
        assert!(!r.extra.contains_key("name"));
        assert_eq!(r.extra["tone"], "hostile");
    }

    #[test]
    fn test_crisis_fallback_shape() {
        let json = serde_json::to_value(CrisisResponse::fallback()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "public_response": "Processing error occurred",
                "private_actions": "System unavailable",
                "psychological_reasoning": "Unable to process through personality matrix",
                "escalation_risk": "Unknown",
                "timeline": "System error",
                "escalation_phase": "Error",
                "belief_impact": "Unable to calculate"
            })
        );
    }

    #[test]
    fn test_document_fallback_shape() {
        let json = serde_json::to_value(DocumentAnalysis::fallback()).unwrap();
        assert_eq!(json["document_interpretation"], "Unable to analyze document");
        assert_eq!(json["authenticity_assessment"], "Unable to assess");
        assert_eq!(json.as_object().unwrap().len(), 5);
    }
}
