use anyhow::Context;
use tracing_subscriber::EnvFilter;

use roadmap_api::app;
use roadmap_api::config::AppConfig;
use roadmap_api::database::DatabaseManager;
use roadmap_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting Roadmap API in {:?} mode", config.environment);

    let store = DatabaseManager::connect(&config.database)
        .await
        .context("database unavailable")?;

    let bind_addr = config.bind_addr();
    let state = AppState::new(store, config);
    let router = app::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("Roadmap API listening on http://{}", bind_addr);
    axum::serve(listener, router).await?;

    Ok(())
}
