//! Persona system: static leader profiles that drive prompt construction.
//!
//! Each configured persona is identified by a [`PersonaId`] and resolved once
//! at startup into a [`PersonaRecord`]: the profile and belief documents read
//! from disk plus the fixed [`PersonaDescriptor`] (display name, voice, and
//! the phrasing used by the aggregate analytics).
//!
//! # Architecture
//!
//! ```text
//! data/personalities/<stem>_final_profile.json ─┐
//! data/personalities/<stem>_beliefs.json ───────┤
//!                                               ↓  PersonaStore::load
//! PersonaId ──descriptor()──→ PersonaDescriptor  PersonaRecord { profile, beliefs }
//!                                               ↓  Arc<PersonaStore>
//!                              prompts / orchestrator / analytics / speech
//! ```
//!
//! The store is immutable after load and shared read-only across requests.

pub mod error;
pub mod profile;
pub mod store;

// Re-exports
pub use error::PersonaError;
pub use profile::{
    BehavioralParameters, CrisisLatency, OceanScores, PersonaBeliefs, PersonaProfile, Stance,
    STANCE_CATEGORIES,
};
pub use store::{
    InsightFraming, NoteStyle, PersonaDescriptor, PersonaId, PersonaRecord, PersonaStore,
};
