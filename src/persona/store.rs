//! Persona identifiers, static descriptors, and the startup-loaded store.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::PersonaError;
use super::profile::{PersonaBeliefs, PersonaProfile};

// ---------------------------------------------------------------------------
// PersonaId
// ---------------------------------------------------------------------------

/// A configured persona.
///
/// Variant order is the fixed persona order used by the fan-out, the
/// response envelope, and the aggregate analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaId {
    Roosevelt,
    Gandhi,
    Putin,
}

impl PersonaId {
    /// Every configured persona, in order.
    pub const ALL: [PersonaId; 3] = [Self::Roosevelt, Self::Gandhi, Self::Putin];

    /// The wire identifier (`"roosevelt"`, `"gandhi"`, `"putin"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Roosevelt => "roosevelt",
            Self::Gandhi => "gandhi",
            Self::Putin => "putin",
        }
    }

    /// Position in [`PersonaId::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The static descriptor for this persona.
    pub fn descriptor(&self) -> &'static PersonaDescriptor {
        &DESCRIPTORS[self.index()]
    }
}

impl fmt::Display for PersonaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonaId {
    type Err = PersonaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| PersonaError::UnknownPersona(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Static descriptors
// ---------------------------------------------------------------------------

/// How a persona's `personality_notes` line is derived from its profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteStyle {
    /// Public extraversion score.
    Extraversion,
    /// Crisis latency.
    CrisisLatency,
    /// First two escalation ladder steps.
    EscalationPattern,
}

/// How the key-insights list frames a persona's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightFraming {
    /// "favors <escalation phase> approach"
    EscalationPhase,
    /// "prioritizes rapid response | deliberate action"
    Tempo,
    /// "calculates aggressive positioning | strategic patience"
    RiskPosture,
}

/// Fixed, code-level facts about a persona.
#[derive(Debug)]
pub struct PersonaDescriptor {
    pub display_name: &'static str,
    /// Surname used in insights and the BLUF.
    pub short_name: &'static str,
    /// File name prefix under the persona data directory.
    pub file_stem: &'static str,
    /// Text-to-speech voice identifier.
    pub voice_id: &'static str,
    pub note: NoteStyle,
    pub insight: InsightFraming,
    /// Verb introducing the persona's clause in the BLUF.
    pub bluf_verb: &'static str,
    /// Used in the BLUF when the persona has no public response.
    pub bluf_fallback: &'static str,
}

static DESCRIPTORS: [PersonaDescriptor; 3] = [
    PersonaDescriptor {
        display_name: "Theodore Roosevelt",
        short_name: "Roosevelt",
        file_stem: "roosevelt",
        voice_id: "zkXpoOeAWrFgfuIRi0yD",
        note: NoteStyle::Extraversion,
        insight: InsightFraming::EscalationPhase,
        bluf_verb: "emphasizes",
        bluf_fallback: "principled engagement",
    },
    PersonaDescriptor {
        display_name: "Indira Gandhi",
        short_name: "Gandhi",
        file_stem: "indira",
        voice_id: "XB0fDUnXU5powFXDhCwa",
        note: NoteStyle::CrisisLatency,
        insight: InsightFraming::Tempo,
        bluf_verb: "calculates",
        bluf_fallback: "strategic positioning",
    },
    PersonaDescriptor {
        display_name: "Vladimir Putin",
        short_name: "Putin",
        file_stem: "putin",
        voice_id: "pNInz6obpgDQGcFmaJgB",
        note: NoteStyle::EscalationPattern,
        insight: InsightFraming::RiskPosture,
        bluf_verb: "prioritizes",
        bluf_fallback: "leverage maximization",
    },
];

// ---------------------------------------------------------------------------
// PersonaRecord
// ---------------------------------------------------------------------------

/// A fully resolved persona: identifier, profile, and beliefs.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonaRecord {
    pub id: PersonaId,
    pub profile: PersonaProfile,
    pub beliefs: PersonaBeliefs,
}

impl PersonaRecord {
    pub fn new(id: PersonaId, profile: PersonaProfile, beliefs: PersonaBeliefs) -> Self {
        Self {
            id,
            profile,
            beliefs,
        }
    }

    pub fn descriptor(&self) -> &'static PersonaDescriptor {
        self.id.descriptor()
    }

    pub fn display_name(&self) -> &'static str {
        self.descriptor().display_name
    }

    /// One-line summary of the profile trait that characterises this persona.
    pub fn personality_note(&self) -> String {
        let params = &self.profile.behavioral_parameters;
        match self.descriptor().note {
            NoteStyle::Extraversion => format!(
                "Extraversion: {}/10 → Bold public positioning",
                self.profile.public_ocean_scores.extraversion
            ),
            NoteStyle::CrisisLatency => format!(
                "Crisis latency: {} → Strategic delay",
                params.crisis_latency_hours
            ),
            NoteStyle::EscalationPattern => {
                let step = |i: usize| {
                    params
                        .escalation_ladder
                        .get(i)
                        .map(String::as_str)
                        .unwrap_or("unknown")
                };
                format!("Escalation pattern: {} → {}", step(0), step(1))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PersonaStore
// ---------------------------------------------------------------------------

/// Immutable map from [`PersonaId`] to its [`PersonaRecord`].
///
/// Always holds exactly one record per configured persona, so lookups are
/// infallible.
#[derive(Debug, Clone)]
pub struct PersonaStore {
    records: Vec<Arc<PersonaRecord>>,
}

impl PersonaStore {
    /// Load every configured persona from `dir`.
    ///
    /// Reads `<stem>_final_profile.json` and `<stem>_beliefs.json` for each
    /// persona. Any missing or malformed file fails the whole load.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, PersonaError> {
        let dir = dir.as_ref();
        let records = PersonaId::ALL
            .iter()
            .map(|&id| {
                let stem = id.descriptor().file_stem;
                let profile = read_json(dir.join(format!("{}_final_profile.json", stem)))?;
                let beliefs = read_json(dir.join(format!("{}_beliefs.json", stem)))?;
                tracing::debug!(persona = %id, "loaded persona data from {}", dir.display());
                Ok(PersonaRecord::new(id, profile, beliefs))
            })
            .collect::<Result<Vec<_>, PersonaError>>()?;
        Self::from_records(records)
    }

    /// Build a store from already-parsed records, one per configured persona.
    pub fn from_records(records: Vec<PersonaRecord>) -> Result<Self, PersonaError> {
        let mut slots: Vec<Option<Arc<PersonaRecord>>> = vec![None; PersonaId::ALL.len()];
        for record in records {
            let slot = &mut slots[record.id.index()];
            if slot.is_some() {
                return Err(PersonaError::Duplicate(record.id));
            }
            *slot = Some(Arc::new(record));
        }

        let records = slots
            .into_iter()
            .zip(PersonaId::ALL)
            .map(|(slot, id)| slot.ok_or(PersonaError::Missing(id)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { records })
    }

    pub fn get(&self, id: PersonaId) -> &Arc<PersonaRecord> {
        &self.records[id.index()]
    }

    /// Records in persona order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<PersonaRecord>> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn read_json<T: DeserializeOwned>(path: PathBuf) -> Result<T, PersonaError> {
    let raw = fs::read_to_string(&path).map_err(|source| PersonaError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| PersonaError::Json { path, source })
}

/// Directory holding the persona files shipped with the crate.
#[cfg(test)]
pub(crate) fn bundled_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data/personalities")
}

/// The shipped personas, for tests elsewhere in the crate.
#[cfg(test)]
pub(crate) fn bundled_store() -> PersonaStore {
    PersonaStore::load(bundled_data_dir()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_id_round_trips_through_str() {
        for id in PersonaId::ALL {
            assert_eq!(id.as_str().parse::<PersonaId>().unwrap(), id);
        }
        assert!(matches!(
            "unknown-id".parse::<PersonaId>(),
            Err(PersonaError::UnknownPersona(s)) if s == "unknown-id"
        ));
    }

    #[test]
    fn test_persona_id_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&PersonaId::Gandhi).unwrap(), "\"gandhi\"");
    }

    #[test]
    fn test_load_bundled_personas() {
        let store = bundled_store();
        assert_eq!(store.len(), 3);
        let order: Vec<PersonaId> = store.iter().map(|r| r.id).collect();
        assert_eq!(order, PersonaId::ALL.to_vec());
        assert_eq!(store.get(PersonaId::Gandhi).display_name(), "Indira Gandhi");
        assert!(!store.get(PersonaId::Putin).beliefs.beliefs.is_empty());
    }

    #[test]
    fn test_personality_notes() {
        let store = bundled_store();
        assert_eq!(
            store.get(PersonaId::Roosevelt).personality_note(),
            "Extraversion: 9.5/10 → Bold public positioning"
        );
        assert_eq!(
            store.get(PersonaId::Gandhi).personality_note(),
            "Crisis latency: 48-72 → Strategic delay"
        );
        assert_eq!(
            store.get(PersonaId::Putin).personality_note(),
            "Escalation pattern: Information operations → Energy leverage"
        );
    }

    #[test]
    fn test_load_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PersonaStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, PersonaError::Io { .. }));
    }

    #[test]
    fn test_load_fails_on_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        for entry in fs::read_dir(bundled_data_dir()).unwrap() {
            let path = entry.unwrap().path();
            fs::copy(&path, dir.path().join(path.file_name().unwrap())).unwrap();
        }
        fs::write(dir.path().join("putin_beliefs.json"), "{\"beliefs\": [").unwrap();

        let err = PersonaStore::load(dir.path()).unwrap_err();
        match err {
            PersonaError::Json { path, .. } => assert!(path.ends_with("putin_beliefs.json")),
            other => panic!("expected JSON error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_records_requires_every_persona() {
        let store = bundled_store();
        let partial = vec![store.get(PersonaId::Roosevelt).as_ref().clone()];
        assert!(matches!(
            PersonaStore::from_records(partial),
            Err(PersonaError::Missing(PersonaId::Gandhi))
        ));
    }

    #[test]
    fn test_from_records_rejects_duplicates() {
        let store = bundled_store();
        let mut records: Vec<PersonaRecord> = store.iter().map(|r| r.as_ref().clone()).collect();
        records.push(records[0].clone());
        assert!(matches!(
            PersonaStore::from_records(records),
            Err(PersonaError::Duplicate(PersonaId::Roosevelt))
        ));
    }
}
