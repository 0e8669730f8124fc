//! Persona prompt rendering.
//!
//! Renderers are pure: identical inputs always produce byte-identical
//! prompts, and the task text is embedded verbatim (size limits are enforced
//! at the HTTP boundary, not here).

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::persona::{PersonaRecord, STANCE_CATEGORIES};

/// Trailing user message for crisis analysis.
pub const CRISIS_USER_INSTRUCTION: &str =
    "Process this crisis through your complete psychological framework and respond accordingly.";

/// Trailing user message for document analysis.
pub const DOCUMENT_USER_INSTRUCTION: &str =
    "Analyze this document through your psychological framework.";

/// Shown in place of a stance the profile does not define.
const UNSPECIFIED_STANCE: &str = "Not specified in profile";

/// The two task types a persona can be asked to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Crisis,
    Document,
}

impl TaskKind {
    /// Completion token budget for this task.
    pub fn max_tokens(&self) -> u32 {
        match self {
            Self::Crisis => 800,
            Self::Document => 600,
        }
    }

    pub fn user_instruction(&self) -> &'static str {
        match self {
            Self::Crisis => CRISIS_USER_INSTRUCTION,
            Self::Document => DOCUMENT_USER_INSTRUCTION,
        }
    }
}

/// A rendered system/user prompt pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPrompt {
    pub kind: TaskKind,
    /// The persona-specific system instruction.
    pub system: String,
    /// The fixed trailing user instruction.
    pub user: String,
}

impl RenderedPrompt {
    fn new(kind: TaskKind, system: String) -> Self {
        Self {
            kind,
            system,
            user: kind.user_instruction().to_string(),
        }
    }
}

/// Render the crisis-analysis prompt for `record`.
///
/// Embeds both OCEAN vectors, the behavioral parameters, the belief map,
/// the contradiction and context-switching lists, the preferred stance and
/// the crisis text, and requires a seven-field JSON reply.
pub fn render_crisis_prompt(record: &PersonaRecord, crisis: &str) -> RenderedPrompt {
    let profile = &record.profile;
    let params = &profile.behavioral_parameters;
    let (public_stance, private_stance) = profile.preferred_stance(&STANCE_CATEGORIES);

    let mut beliefs = String::new();
    for (topic, statement) in &record.beliefs.beliefs {
        let _ = writeln!(beliefs, "- {}: {}", topic, statement);
    }

    let system = format!(
        r#"You are {name}.

PSYCHOLOGICAL PROFILE (from historical analysis):
Public OCEAN Scores: {public_ocean}

Behavioral OCEAN Scores: {behavioral_ocean}

CRISIS RESPONSE PARAMETERS:
- Crisis latency: {latency}
- Escalation ladder: {ladder}
- Scapegoat probability: {scapegoat}%

CURRENT BELIEF STATE:
{beliefs}
CONTRADICTION PATTERNS:
{contradictions}

CONTEXTUAL SWITCHING RULES:
{switching}

PREDICTIVE FRAMEWORK for this type of crisis:
- Public approach: {public_stance}
- Private approach: {private_stance}

CRISIS SCENARIO: {crisis}

Based on your complete psychological profile, belief state, and historical decision patterns, respond with a JSON object:
{{
  "public_response": "Your public statement (using your communication style)",
  "private_actions": "Your behind-the-scenes moves (based on your behavioral patterns)",
  "psychological_reasoning": "Explain your decision process using your personality traits, escalation ladder position, and belief state",
  "escalation_risk": "Low/Medium/High (based on your escalation ladder)",
  "timeline": "When you would act (based on your crisis_latency_hours)",
  "escalation_phase": "Current position on your escalation ladder",
  "belief_impact": "How this crisis affects your belief state"
}}

Stay completely true to your psychological profile and historical patterns."#,
        name = record.display_name(),
        public_ocean = profile.public_ocean_scores,
        behavioral_ocean = profile.behavioral_ocean_scores,
        latency = params.crisis_latency_hours,
        ladder = params.escalation_ladder.join(" → "),
        scapegoat = params.scapegoat_probability_pct,
        beliefs = beliefs,
        contradictions = profile.contradiction_patterns.join("\n"),
        switching = profile.contextual_switching_rules.join("\n"),
        public_stance = public_stance.unwrap_or(UNSPECIFIED_STANCE),
        private_stance = private_stance.unwrap_or(UNSPECIFIED_STANCE),
        crisis = crisis,
    );

    RenderedPrompt::new(TaskKind::Crisis, system)
}

/// Render the document-interpretation prompt for `record`.
pub fn render_document_prompt(record: &PersonaRecord, document: &str) -> RenderedPrompt {
    let system = format!(
        r#"You are {name}. Analyze this diplomatic document through your psychological framework.

DOCUMENT: "{document}"

Based on your psychological profile, analyze what this document REALLY means:
- What are the hidden intentions behind the words?
- What psychological tactics do you see being used?
- How would you respond to this document?

Respond with a JSON object:
{{
  "document_interpretation": "What this document really means from your perspective",
  "hidden_intentions": "What the author is actually trying to accomplish",
  "psychological_tactics": "What manipulation or persuasion techniques you identify",
  "your_response": "How you would respond to this document",
  "authenticity_assessment": "Whether you believe this document is genuine or deceptive"
}}

Stay completely in character based on your personality profile."#,
        name = record.display_name(),
        document = document,
    );

    RenderedPrompt::new(TaskKind::Document, system)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::store::bundled_store;
    use crate::persona::PersonaId;

    #[test]
    fn test_crisis_prompt_is_deterministic() {
        let store = bundled_store();
        let record = store.get(PersonaId::Gandhi);
        let a = render_crisis_prompt(record, "Border standoff in the Himalayas");
        let b = render_crisis_prompt(record, "Border standoff in the Himalayas");
        assert_eq!(a, b);
        assert_eq!(a.system.as_bytes(), b.system.as_bytes());
    }

    #[test]
    fn test_crisis_prompt_embeds_profile() {
        let store = bundled_store();
        let record = store.get(PersonaId::Putin);
        let prompt = render_crisis_prompt(record, "Pipeline sabotage in the Baltic");

        assert!(prompt.system.starts_with("You are Vladimir Putin.\n"));
        assert!(prompt.system.contains("Public OCEAN Scores: Openness=4, Conscientiousness=8"));
        assert!(prompt.system.contains("- Crisis latency: 24\n"));
        assert!(prompt
            .system
            .contains("- Escalation ladder: Information operations → Energy leverage → "));
        assert!(prompt.system.contains("- Scapegoat probability: 70%"));
        assert!(prompt.system.contains("- leverage: Energy and security dependence"));
        assert!(prompt.system.contains("Calls for dialogue while expanding facts on the ground\n"));
        assert!(prompt
            .system
            .contains("- Public approach: Frames the position as defensive"));
        assert!(prompt.system.contains("CRISIS SCENARIO: Pipeline sabotage in the Baltic\n"));
        for field in [
            "public_response",
            "private_actions",
            "psychological_reasoning",
            "escalation_risk",
            "timeline",
            "escalation_phase",
            "belief_impact",
        ] {
            assert!(prompt.system.contains(&format!("\"{}\":", field)), "missing {field}");
        }
        assert_eq!(prompt.user, CRISIS_USER_INSTRUCTION);
        assert_eq!(prompt.kind.max_tokens(), 800);
    }

    #[test]
    fn test_crisis_prompt_keeps_long_text_verbatim() {
        let store = bundled_store();
        let crisis = "x".repeat(10_000);
        let prompt = render_crisis_prompt(store.get(PersonaId::Roosevelt), &crisis);
        assert!(prompt.system.contains(&crisis));
    }

    #[test]
    fn test_crisis_prompt_without_known_stance() {
        let store = bundled_store();
        let mut record = store.get(PersonaId::Roosevelt).as_ref().clone();
        record.profile.predictive_framework.clear();
        let prompt = render_crisis_prompt(&record, "test");
        assert!(prompt
            .system
            .contains(&format!("- Public approach: {}", UNSPECIFIED_STANCE)));
    }

    #[test]
    fn test_document_prompt_fields() {
        let store = bundled_store();
        let prompt = render_document_prompt(store.get(PersonaId::Roosevelt), "Treaty draft");
        assert!(prompt.system.starts_with("You are Theodore Roosevelt."));
        assert!(prompt.system.contains("DOCUMENT: \"Treaty draft\""));
        for field in [
            "document_interpretation",
            "hidden_intentions",
            "psychological_tactics",
            "your_response",
            "authenticity_assessment",
        ] {
            assert!(prompt.system.contains(&format!("\"{}\":", field)), "missing {field}");
        }
        assert_eq!(prompt.user, DOCUMENT_USER_INSTRUCTION);
        assert_eq!(prompt.kind.max_tokens(), 600);
    }
}
