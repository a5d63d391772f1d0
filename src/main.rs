//! Worksheet generator backend.
//!
//! Important env variables:
//!   PORT                  : u16 (default 3000)
//!   OPENAI_API_KEY        : required for generation; without it /api/generate answers 500
//!   OPENAI_BASE_URL       : default "https://api.openai.com/v1"
//!   OPENAI_MODEL          : default "gpt-4o-mini"
//!   WORKSHEET_CONFIG_PATH : path to TOML config (prompt template + temperature)
//!   STATIC_DIR            : default "./static"
//!   LOG_LEVEL             : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT            : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;
use tracing::info;

use worksheet_backend::config::Settings;
use worksheet_backend::routes::build_router;
use worksheet_backend::state::AppState;
use worksheet_backend::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let settings = Settings::from_env();
  info!(target: "worksheet_backend", ?settings, "Settings loaded");

  // Shared, immutable application state (prompts + optional provider).
  let state = Arc::new(AppState::from_settings(&settings));
  let app = build_router(state, &settings.static_dir);

  let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
  let listener = TcpListener::bind(addr).await?;
  info!(target: "worksheet_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "worksheet_backend", "HTTP server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "worksheet_backend", error = %e, "Failed to listen for Ctrl-C");
    std::future::pending::<()>().await;
  }
  info!(target: "worksheet_backend", "Shutdown signal received");
}
