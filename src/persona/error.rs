//! Persona loading errors.

use std::path::PathBuf;

use thiserror::Error;

use super::store::PersonaId;

/// Errors raised while resolving persona data.
///
/// Every variant except [`PersonaError::UnknownPersona`] is a startup-time
/// failure: the server refuses to start on partial persona data.
#[derive(Debug, Error)]
pub enum PersonaError {
    /// A persona data file could not be read.
    #[error("failed to read persona file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persona data file is not valid JSON or misses a required key.
    #[error("malformed persona file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A string identifier does not name a configured persona.
    #[error("unknown persona: {0}")]
    UnknownPersona(String),

    /// The store was built without a record for a configured persona.
    #[error("no record supplied for persona '{0}'")]
    Missing(PersonaId),

    /// The store was built with two records for the same persona.
    #[error("duplicate record for persona '{0}'")]
    Duplicate(PersonaId),
}
