//! Axum route handlers for the AdversaryIQ HTTP server.
//!
//! # Routes
//!
//! - `POST /api/process-crisis`    — `{crisis}` → crisis assessment envelope
//! - `POST /api/analyze-document`  — `{documentText, filename}` → document report
//! - `POST /api/synthesize-voice`  — `{text, agent}` → `audio/mpeg` bytes
//! - `GET  /api/health`            — `{status, message, timestamp}`
//!
//! Request bodies are read as raw bytes: an empty body is treated as `{}`,
//! and empty strings count as missing fields.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use crate::analytics::truncate_with_ellipsis;
use crate::config::DEFAULT_MAX_BODY_BYTES;
use crate::orchestrator::{timestamp_now, CrisisAssessment, DocumentReport, Orchestrator};
use crate::speech::{voice_for, SpeechSynthesizer};

/// Characters of voice text echoed into the request log.
const VOICE_LOG_PREVIEW_CHARS: usize = 50;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Persona fan-out over the completion backend.
    pub orchestrator: Arc<Orchestrator>,
    /// Text-to-speech backend.
    pub speech: Arc<dyn SpeechSynthesizer>,
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            orchestrator,
            speech,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_body_limit(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    let body_limit = state.max_body_bytes;
    Router::new()
        .route("/api/process-crisis", post(process_crisis_handler))
        .route("/api/analyze-document", post(analyze_document_handler))
        .route("/api/synthesize-voice", post(synthesize_voice_handler))
        .route("/api/health", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CrisisRequest {
    crisis: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DocumentRequest {
    document_text: Option<String>,
    filename: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VoiceRequest {
    text: Option<String>,
    agent: Option<String>,
}

/// Parse a JSON body, treating an empty (or whitespace-only) body as `{}`.
///
/// Fields are only read from a JSON object. Any other top-level value
/// (array, string, number, `null`) carries no named fields and parses as
/// the default request, so the handler reports its missing-field error.
fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    match serde_json::from_slice::<Value>(body)? {
        object @ Value::Object(_) => Ok(serde_json::from_value(object)?),
        _ => Ok(T::default()),
    }
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/process-crisis — every persona reacts to a crisis scenario.
async fn process_crisis_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CrisisAssessment>, ApiError> {
    let request: CrisisRequest = parse_body(&body)?;
    let crisis = present(request.crisis).ok_or(ApiError::BadRequest("Crisis scenario required"))?;

    let assessment = state
        .orchestrator
        .process_crisis(&crisis)
        .await
        .map_err(|e| ApiError::internal("Intelligence processing failed", e))?;

    Ok(Json(assessment))
}

/// POST /api/analyze-document — every persona interprets a document.
async fn analyze_document_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DocumentReport>, ApiError> {
    let request: DocumentRequest = parse_body(&body)?;
    let text = present(request.document_text).ok_or(ApiError::BadRequest("Document text required"))?;

    let report = state
        .orchestrator
        .analyze_document(&text, request.filename.as_deref())
        .await
        .map_err(|e| ApiError::internal("Document analysis failed", e))?;

    Ok(Json(report))
}

/// POST /api/synthesize-voice — speak `text` in the agent's voice.
///
/// Unknown agent names use the first persona's voice.
async fn synthesize_voice_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: VoiceRequest = parse_body(&body)?;
    let (Some(text), Some(agent)) = (present(request.text), present(request.agent)) else {
        return Err(ApiError::BadRequest("Text and agent required"));
    };

    let voice_id = voice_for(&agent);
    tracing::info!(
        %agent,
        voice_id,
        preview = %truncate_with_ellipsis(&text, VOICE_LOG_PREVIEW_CHARS),
        "synthesizing voice"
    );

    let audio = state
        .speech
        .synthesize(&text, voice_id)
        .await
        .map_err(|e| ApiError::internal("Voice synthesis failed", e))?;

    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response())
}

/// GET /api/health — liveness probe.
async fn health_handler() -> Json<Value> {
    Json(serde_json::json!({
        "status": "operational",
        "message": "AdversaryIQ Intelligence Engine Online",
        "timestamp": timestamp_now(),
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
