//! HTTP server.
//!
//! # Endpoints
//!
//! - `POST /api/process-crisis`   — Multi-persona crisis assessment
//! - `POST /api/analyze-document` — Multi-persona document reading
//! - `POST /api/synthesize-voice` — Persona voice synthesis
//! - `GET  /api/health`           — Liveness probe

pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::{app_router, AppState};
