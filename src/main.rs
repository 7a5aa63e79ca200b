mod bot;
mod config;
mod errors;
mod models;
mod routes;
mod search;
mod service;

use std::sync::Arc;

use tracing::info;

use crate::bot::InfoBot;
use crate::config::ServerConfig;
use crate::search::WebKnowledge;
use crate::service::chat_service::ChatService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialise tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "infobot=debug,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env();

    // ── Dependency wiring ─────────────────────────────────────────────────────
    let knowledge = WebKnowledge::new(&config)?;
    let bot = InfoBot::new(Arc::new(knowledge));
    let chat_service = ChatService::new(bot);

    if !config.static_dir.join("index.html").exists() {
        tracing::warn!(
            "No widget build found in {} (run `trunk build` in frontend/)",
            config.static_dir.display()
        );
    }

    // ── Router ────────────────────────────────────────────────────────────────
    let app = routes::router(chat_service, &config.static_dir, config.cors_permissive);

    // ── Listen ────────────────────────────────────────────────────────────────
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}/");

    axum::serve(listener, app).await?;
    Ok(())
}
