//! Aggregate analytics over the per-persona crisis results.
//!
//! All functions are pure and take results in persona order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::agents::CrisisResponse;
use crate::persona::{InsightFraming, PersonaId};

/// Scenario prefix length quoted in the BLUF.
pub const BLUF_SCENARIO_CHARS: usize = 50;

/// Public-response prefix length quoted per persona in the BLUF.
pub const BLUF_RESPONSE_CHARS: usize = 80;

/// Timeline marker for an imminent response.
const IMMEDIATE_MARKER: &str = "Immediate";

/// Coarse risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Exact, case-sensitive match on `"Low"`, `"Medium"` or `"High"`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Low" => Some(Self::Low),
            "Medium" => Some(Self::Medium),
            "High" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify overall risk from per-persona risk labels.
///
/// Two or more `High` is High; one `High` or two or more `Medium` is Medium;
/// anything else is Low. Unrecognized labels count as neither.
pub fn overall_risk<'a, I>(labels: I) -> RiskLevel
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let (mut high, mut medium) = (0usize, 0usize);
    for level in labels.into_iter().flatten().filter_map(RiskLevel::from_label) {
        match level {
            RiskLevel::High => high += 1,
            RiskLevel::Medium => medium += 1,
            RiskLevel::Low => {}
        }
    }

    if high >= 2 {
        RiskLevel::High
    } else if high >= 1 || medium >= 2 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// [`overall_risk`] over crisis results.
pub fn overall_risk_of(results: &[(PersonaId, &CrisisResponse)]) -> RiskLevel {
    overall_risk(results.iter().map(|(_, r)| r.escalation_risk.as_deref()))
}

/// Human-readable insights: timeline variance, risk distribution, then one
/// persona-framed line per persona.
pub fn key_insights(results: &[(PersonaId, &CrisisResponse)]) -> Vec<String> {
    let timelines: Vec<&str> = results.iter().map(|(_, r)| text(&r.timeline)).collect();
    let risks: Vec<&str> = results.iter().map(|(_, r)| text(&r.escalation_risk)).collect();

    let mut insights = vec![
        format!("Response timeline variance: {}", timelines.join(" vs ")),
        format!("Escalation risk distribution: {}", risks.join(", ")),
    ];

    for (id, response) in results {
        let descriptor = id.descriptor();
        let line = match descriptor.insight {
            InsightFraming::EscalationPhase => {
                let phase = response
                    .escalation_phase
                    .as_deref()
                    .filter(|p| !p.is_empty())
                    .map(str::to_lowercase)
                    .unwrap_or_else(|| "measured".to_string());
                format!("{} favors {} approach", descriptor.short_name, phase)
            }
            InsightFraming::Tempo => {
                let tempo = if has_immediate(response) {
                    "rapid response"
                } else {
                    "deliberate action"
                };
                format!("{} prioritizes {}", descriptor.short_name, tempo)
            }
            InsightFraming::RiskPosture => {
                let posture = if response.escalation_risk.as_deref() == Some("High") {
                    "aggressive positioning"
                } else {
                    "strategic patience"
                };
                format!("{} calculates {}", descriptor.short_name, posture)
            }
        };
        insights.push(line);
    }

    insights
}

/// Bottom-line-up-front summary of the whole assessment.
pub fn generate_bluf(results: &[(PersonaId, &CrisisResponse)], scenario: &str) -> String {
    let mut parts = vec![format!(
        "Multi-agent psychological analysis of \"{}\" reveals",
        truncate_with_ellipsis(scenario, BLUF_SCENARIO_CHARS)
    )];

    parts.push(
        match overall_risk_of(results) {
            RiskLevel::High => "significant escalation potential with divergent national interests.",
            RiskLevel::Medium => {
                "moderate tensions with varying strategic approaches across leadership profiles."
            }
            RiskLevel::Low => "manageable diplomatic friction with opportunities for de-escalation.",
        }
        .to_string(),
    );

    if results.iter().any(|(_, r)| has_immediate(r)) {
        parts.push(
            "At least one actor is likely to respond within 24 hours, creating pressure for rapid decision-making."
                .to_string(),
        );
    }

    for (id, response) in results {
        let descriptor = id.descriptor();
        let quoted = response
            .public_response
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| s.chars().take(BLUF_RESPONSE_CHARS).collect::<String>())
            .unwrap_or_else(|| descriptor.bluf_fallback.to_string());
        parts.push(format!(
            "{} {} {}...",
            descriptor.short_name, descriptor.bluf_verb, quoted
        ));
    }

    parts.join(" ")
}

/// First `max` characters of `s`, followed by `...` when anything was cut.
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}

fn has_immediate(response: &CrisisResponse) -> bool {
    response
        .timeline
        .as_deref()
        .is_some_and(|t| t.contains(IMMEDIATE_MARKER))
}

fn text(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(risk: &str, timeline: &str, public: &str) -> CrisisResponse {
        CrisisResponse {
            escalation_risk: Some(risk.into()),
            timeline: Some(timeline.into()),
            public_response: Some(public.into()),
            escalation_phase: Some("Naval Show Of Force".into()),
            ..Default::default()
        }
    }

    fn risks(labels: [&str; 3]) -> RiskLevel {
        overall_risk(labels.map(Some))
    }

    #[test]
    fn test_overall_risk_thresholds() {
        assert_eq!(risks(["High", "High", "Low"]), RiskLevel::High);
        assert_eq!(risks(["High", "Medium", "Low"]), RiskLevel::Medium);
        assert_eq!(risks(["Medium", "Medium", "Low"]), RiskLevel::Medium);
        assert_eq!(risks(["Low", "Low", "Medium"]), RiskLevel::Low);
        assert_eq!(risks(["High", "High", "High"]), RiskLevel::High);
    }

    #[test]
    fn test_overall_risk_ignores_unknown_labels() {
        assert_eq!(risks(["Unknown", "high", "Medium-High"]), RiskLevel::Low);
        assert_eq!(overall_risk([None, Some("High"), None]), RiskLevel::Medium);
    }

    #[test]
    fn test_risk_level_serializes_capitalized() {
        assert_eq!(serde_json::to_string(&RiskLevel::Medium).unwrap(), "\"Medium\"");
    }

    #[test]
    fn test_key_insights() {
        let r = response("Medium", "Within 48 hours", "We seek calm.");
        let g = response("Low", "Immediate consultations", "Sovereignty first.");
        let p = response("High", "72 hours", "Consequences will follow.");
        let results = [
            (PersonaId::Roosevelt, &r),
            (PersonaId::Gandhi, &g),
            (PersonaId::Putin, &p),
        ];

        assert_eq!(
            key_insights(&results),
            vec![
                "Response timeline variance: Within 48 hours vs Immediate consultations vs 72 hours",
                "Escalation risk distribution: Medium, Low, High",
                "Roosevelt favors naval show of force approach",
                "Gandhi prioritizes rapid response",
                "Putin calculates aggressive positioning",
            ]
        );
    }

    #[test]
    fn test_key_insights_defaults() {
        let empty = CrisisResponse::default();
        let results = [
            (PersonaId::Roosevelt, &empty),
            (PersonaId::Gandhi, &empty),
            (PersonaId::Putin, &empty),
        ];
        let insights = key_insights(&results);
        assert_eq!(insights[0], "Response timeline variance:  vs  vs ");
        assert_eq!(insights[2], "Roosevelt favors measured approach");
        assert_eq!(insights[3], "Gandhi prioritizes deliberate action");
        assert_eq!(insights[4], "Putin calculates strategic patience");
    }

    #[test]
    fn test_bluf_truncates_scenario() {
        let scenario = "A".repeat(60);
        let r = CrisisResponse::default();
        let results = [(PersonaId::Roosevelt, &r)];
        let bluf = generate_bluf(&results, &scenario);
        assert!(bluf.starts_with(&format!(
            "Multi-agent psychological analysis of \"{}...\" reveals ",
            "A".repeat(50)
        )));
        assert!(!bluf.contains(&"A".repeat(51)));
    }

    #[test]
    fn test_bluf_short_scenario_is_not_truncated() {
        let r = CrisisResponse::default();
        let bluf = generate_bluf(&[(PersonaId::Putin, &r)], "Gas dispute");
        assert!(bluf.starts_with("Multi-agent psychological analysis of \"Gas dispute\" reveals manageable"));
    }

    #[test]
    fn test_bluf_full_text() {
        let long_public = "x".repeat(100);
        let r = response("High", "Immediate", &long_public);
        let g = response("High", "Within a week", "Sovereignty first.");
        let p = CrisisResponse::default();
        let results = [
            (PersonaId::Roosevelt, &r),
            (PersonaId::Gandhi, &g),
            (PersonaId::Putin, &p),
        ];

        let bluf = generate_bluf(&results, "Strait closure");
        assert_eq!(
            bluf,
            format!(
                "Multi-agent psychological analysis of \"Strait closure\" reveals \
                 significant escalation potential with divergent national interests. \
                 At least one actor is likely to respond within 24 hours, creating pressure for rapid decision-making. \
                 Roosevelt emphasizes {}... \
                 Gandhi calculates Sovereignty first.... \
                 Putin prioritizes leverage maximization...",
                "x".repeat(80)
            )
        );
    }

    #[test]
    fn test_truncate_counts_characters() {
        let s = "é".repeat(55);
        let out = truncate_with_ellipsis(&s, 50);
        assert_eq!(out.chars().count(), 53);
        assert!(out.ends_with("..."));
        assert_eq!(truncate_with_ellipsis("short", 50), "short");
        assert_eq!(truncate_with_ellipsis(&"b".repeat(50), 50), "b".repeat(50));
    }
}
