//! MindQuest HTTP server binary.
//!
//! Serves quest sessions over JSON and mints finished profiles on an
//! in-process chain.
//!
//! # Environment Variables
//!
//! See [`mindquest::config`] for the full list. The common ones:
//!
//! - `PORT`: HTTP port (default: 8080)
//! - `GROQ_API_KEY`: enables remote stories; unset uses the fallback set
//! - `MINDQUEST_SCORING`: `keyword` (default) or `adjustment`
//! - `RUST_LOG`: Tracing filter (default: "info,mindquest=debug")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use anyhow::Context;
use mindquest::config::QuestConfig;
use mindquest::server::{app_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,mindquest=debug".into()),
        )
        .init();

    let config = QuestConfig::from_env().context("invalid configuration")?;
    let bind_addr = format!("0.0.0.0:{}", config.port);

    let state = AppState::from_config(&config).context("failed to build application state")?;
    tracing::info!(
        scoring = %config.scoring,
        questions = state.bank.len(),
        remote_narrator = state.narrator.has_remote(),
        chain_id = %config.chain_id,
        contract = %config.contract_address,
        "configuration loaded"
    );

    let app = app_router(state);

    tracing::info!("mindquest server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health            : liveness check");
    tracing::info!("  POST /sessions          : new quest session");
    tracing::info!("  POST /sessions/:id/...  : start, answer, mint, reset");
    tracing::info!("  DELETE /sessions/:id    : drop a session");
    tracing::info!("  GET  /tokens/:id        : minted personality record");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
