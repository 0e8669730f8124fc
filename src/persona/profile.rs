//! Persona profile and belief documents.
//!
//! These types mirror the JSON files under `data/personalities/`. Their shape
//! is an external contract: a missing trait vector, behavioral parameter, or
//! list fails deserialization at startup rather than being defaulted.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Names for the 5 OCEAN axes, in rendering order.
pub const OCEAN_AXIS_NAMES: [&str; 5] = [
    "Openness",
    "Conscientiousness",
    "Extraversion",
    "Agreeableness",
    "Neuroticism",
];

/// Scenario categories consulted, in order, when picking a stance from the
/// predictive framework.
pub const STANCE_CATEGORIES: [&str; 2] = ["international_negotiation", "economic_pressure"];

// ---------------------------------------------------------------------------
// Trait vectors
// ---------------------------------------------------------------------------

/// A five-factor (OCEAN) personality vector on a 0-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OceanScores {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
}

impl OceanScores {
    /// Scores in [`OCEAN_AXIS_NAMES`] order.
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.openness,
            self.conscientiousness,
            self.extraversion,
            self.agreeableness,
            self.neuroticism,
        ]
    }
}

impl fmt::Display for OceanScores {
    /// Renders `Openness=8, Conscientiousness=8.5, ...`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = OCEAN_AXIS_NAMES
            .iter()
            .zip(self.as_array())
            .map(|(name, score)| format!("{}={}", name, score))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Behavioral parameters
// ---------------------------------------------------------------------------

/// Crisis response latency. Profiles give either a number of hours or a
/// free-text range such as `"48-72"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CrisisLatency {
    Hours(f64),
    Text(String),
}

impl fmt::Display for CrisisLatency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hours(h) => write!(f, "{}", h),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Crisis response parameters of a persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralParameters {
    pub crisis_latency_hours: CrisisLatency,
    /// Ordered from least to most escalatory.
    pub escalation_ladder: Vec<String>,
    pub scapegoat_probability_pct: f64,
}

/// Public and private approach for one scenario category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stance {
    #[serde(default)]
    pub public: String,
    #[serde(default)]
    pub private: String,
}

// ---------------------------------------------------------------------------
// Profile / beliefs documents
// ---------------------------------------------------------------------------

/// Contents of `<stem>_final_profile.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub public_ocean_scores: OceanScores,
    pub behavioral_ocean_scores: OceanScores,
    pub behavioral_parameters: BehavioralParameters,
    pub contradiction_patterns: Vec<String>,
    pub contextual_switching_rules: Vec<String>,
    /// Scenario category -> stance, in file order.
    pub predictive_framework: IndexMap<String, Stance>,
}

impl PersonaProfile {
    /// Pick the public and private approach for a crisis.
    ///
    /// Each side is taken from the first category in `categories` that has a
    /// non-empty value for it, so the two halves may come from different
    /// categories. `None` when no listed category supplies one.
    pub fn preferred_stance<'a>(&'a self, categories: &[&str]) -> (Option<&'a str>, Option<&'a str>) {
        let pick = |side: fn(&Stance) -> &str| {
            categories
                .iter()
                .filter_map(|c| self.predictive_framework.get(*c))
                .map(side)
                .find(|s| !s.is_empty())
        };
        (pick(|s| s.public.as_str()), pick(|s| s.private.as_str()))
    }
}

/// Contents of `<stem>_beliefs.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaBeliefs {
    #[serde(default)]
    pub id: Option<String>,
    /// Belief topic -> statement, in file order.
    pub beliefs: IndexMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_json(framework: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "public_ocean_scores": {
                "openness": 8, "conscientiousness": 8.5, "extraversion": 9.5,
                "agreeableness": 4.5, "neuroticism": 4
            },
            "behavioral_ocean_scores": {
                "openness": 7, "conscientiousness": 8, "extraversion": 9,
                "agreeableness": 5, "neuroticism": 5.5
            },
            "behavioral_parameters": {
                "crisis_latency_hours": "48-72",
                "escalation_ladder": ["Statement", "Sanctions"],
                "scapegoat_probability_pct": 35
            },
            "contradiction_patterns": ["a"],
            "contextual_switching_rules": ["b"],
            "predictive_framework": framework
        })
    }

    #[test]
    fn test_ocean_display_formats_integers_without_fraction() {
        let p: PersonaProfile =
            serde_json::from_value(profile_json(serde_json::json!({}))).unwrap();
        assert_eq!(
            p.public_ocean_scores.to_string(),
            "Openness=8, Conscientiousness=8.5, Extraversion=9.5, Agreeableness=4.5, Neuroticism=4"
        );
    }

    #[test]
    fn test_latency_accepts_number_or_text() {
        let hours: CrisisLatency = serde_json::from_str("12").unwrap();
        assert_eq!(hours.to_string(), "12");
        let text: CrisisLatency = serde_json::from_str("\"48-72\"").unwrap();
        assert_eq!(text, CrisisLatency::Text("48-72".into()));
    }

    #[test]
    fn test_missing_trait_vector_is_rejected() {
        let mut json = profile_json(serde_json::json!({}));
        json.as_object_mut().unwrap().remove("behavioral_ocean_scores");
        assert!(serde_json::from_value::<PersonaProfile>(json).is_err());
    }

    #[test]
    fn test_preferred_stance_falls_back_per_side() {
        let p: PersonaProfile = serde_json::from_value(profile_json(serde_json::json!({
            "international_negotiation": {"public": "broker"},
            "economic_pressure": {"public": "tariffs", "private": "back channel"}
        })))
        .unwrap();
        assert_eq!(
            p.preferred_stance(&STANCE_CATEGORIES),
            (Some("broker"), Some("back channel"))
        );
    }

    #[test]
    fn test_preferred_stance_none_when_no_known_category() {
        let p: PersonaProfile = serde_json::from_value(profile_json(serde_json::json!({
            "military_confrontation": {"public": "warn", "private": "mobilize"}
        })))
        .unwrap();
        assert_eq!(p.preferred_stance(&STANCE_CATEGORIES), (None, None));
    }

    #[test]
    fn test_beliefs_keep_file_order() {
        let b: PersonaBeliefs = serde_json::from_str(
            r#"{"beliefs": {"zeta": "last letter", "alpha": "first letter"}}"#,
        )
        .unwrap();
        let keys: Vec<&str> = b.beliefs.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }
}
