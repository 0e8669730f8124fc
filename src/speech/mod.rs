//! Text-to-speech.
//!
//! [`SpeechSynthesizer`] is the seam between the HTTP surface and a speech
//! vendor. [`elevenlabs::ElevenLabsSynthesizer`] is the only implementation.

pub mod elevenlabs;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::persona::PersonaId;

pub use elevenlabs::ElevenLabsSynthesizer;

/// Errors from a speech backend. Unlike completion errors these are not
/// replaced by a fallback; they surface to the caller.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("{provider} API key not configured")]
    MissingApiKey { provider: String },

    #[error("speech request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },
}

/// Converts text to audio in a given voice.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + std::fmt::Debug {
    /// Synthesize `text` and return the whole audio payload (MPEG).
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Bytes, SpeechError>;
}

/// Voice identifier for an agent name.
///
/// Unrecognized names get the first configured persona's voice.
pub fn voice_for(agent: &str) -> &'static str {
    let id = agent.parse::<PersonaId>().unwrap_or(PersonaId::ALL[0]);
    id.descriptor().voice_id
}
