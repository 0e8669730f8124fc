//! AdversaryIQ HTTP server binary.
//!
//! Loads the persona data, wires the OpenAI completion backend and the
//! ElevenLabs speech backend, and serves the API until Ctrl-C.
//!
//! # Environment Variables
//!
//! See [`adversaryiq::config`] for the full list. A `.env` file in the
//! working directory is loaded first if present.
//!
//! - `PORT` — HTTP port (default: 3001)
//! - `RUST_LOG` — Tracing filter (default: "info,adversaryiq=debug")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use std::sync::Arc;

use anyhow::Context;

use adversaryiq::config::AppConfig;
use adversaryiq::llms::OpenAICompletion;
use adversaryiq::BaseLLM;
use adversaryiq::orchestrator::Orchestrator;
use adversaryiq::persona::PersonaStore;
use adversaryiq::server::{app_router, AppState};
use adversaryiq::speech::ElevenLabsSynthesizer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,adversaryiq=debug".into()),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    config.warn_missing_keys();
    tracing::debug!(?config, "configuration loaded");

    let personas = PersonaStore::load(&config.persona_data_dir).with_context(|| {
        format!(
            "failed to load persona data from {}",
            config.persona_data_dir.display()
        )
    })?;
    tracing::info!(count = personas.len(), "persona profiles loaded");

    let llm = OpenAICompletion::new(
        config.openai_model.clone(),
        config.openai_api_key.clone(),
        Some(config.openai_base_url.clone()),
        config.http_timeout,
    )
    .context("failed to build OpenAI client")?;
    tracing::info!(provider = llm.provider(), model = llm.model(), "completion backend ready");

    let speech = ElevenLabsSynthesizer::new(
        config.elevenlabs_api_key.clone(),
        Some(config.elevenlabs_base_url.clone()),
        config.http_timeout,
    )
    .context("failed to build ElevenLabs client")?;

    let orchestrator = Orchestrator::new(Arc::new(personas), Arc::new(llm));
    let state = AppState::new(Arc::new(orchestrator), Arc::new(speech))
        .with_body_limit(config.max_body_bytes);
    let app = app_router(state);

    let bind_addr = format!("0.0.0.0:{}", config.port);

    tracing::info!("AdversaryIQ Intelligence Engine v{} starting on {}", adversaryiq::VERSION, bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  POST /api/process-crisis   — multi-persona crisis assessment");
    tracing::info!("  POST /api/analyze-document — multi-persona document analysis");
    tracing::info!("  POST /api/synthesize-voice — persona voice synthesis");
    tracing::info!("  GET  /api/health           — liveness probe");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
