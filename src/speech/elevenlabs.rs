//! ElevenLabs text-to-speech provider.

use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use serde_json::Value;

use super::{SpeechError, SpeechSynthesizer};

/// Default API base URL.
pub const ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io/v1";

/// Synthesis model sent with every request.
pub const ELEVENLABS_MODEL_ID: &str = "eleven_multilingual_v2";

/// ElevenLabs client. One `POST {base_url}/text-to-speech/{voice_id}` per
/// call; the streamed audio body is collected into a single buffer.
#[derive(Clone)]
pub struct ElevenLabsSynthesizer {
    api_key: Option<String>,
    base_url: String,
    model_id: String,
    client: reqwest::Client,
}

impl ElevenLabsSynthesizer {
    pub fn new(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SpeechError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| ELEVENLABS_BASE_URL.to_string()),
            model_id: ELEVENLABS_MODEL_ID.to_string(),
            client,
        })
    }

    pub fn api_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn endpoint(&self, voice_id: &str) -> String {
        format!("{}/text-to-speech/{}", self.api_base_url(), voice_id)
    }

    pub fn build_request_body(&self, text: &str) -> Value {
        serde_json::json!({
            "text": text,
            "model_id": self.model_id,
        })
    }
}

impl std::fmt::Debug for ElevenLabsSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevenLabsSynthesizer")
            .field("base_url", &self.base_url)
            .field("model_id", &self.model_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSynthesizer {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Bytes, SpeechError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| SpeechError::MissingApiKey {
                provider: "ElevenLabs".into(),
            })?;

        let response = self
            .client
            .post(self.endpoint(voice_id))
            .header("xi-api-key", api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&self.build_request_body(text))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Status {
                provider: "ElevenLabs".into(),
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        let mut audio = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            audio.extend_from_slice(&chunk?);
        }

        tracing::debug!(voice_id, bytes = audio.len(), "ElevenLabs audio received");
        Ok(audio.freeze())
    }
}
