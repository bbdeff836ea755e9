use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use teamspace_api::config::{self, AppConfig};
use teamspace_api::database::{DatabaseManager, PgWorkspaceStore};
use teamspace_api::routes::app;
use teamspace_api::state::AppState;
use teamspace_api::storage::FilesystemStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("teamspace_api=info,tower_http=info")),
        )
        .init();

    let config: AppConfig = config::config().clone();
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;
    tracing::info!("Starting Teamspace API in {:?} mode", config.environment);
    if !teamspace_api::is_production!() {
        tracing::warn!("Non-production defaults in effect; do not expose this instance publicly");
    }

    let pool = DatabaseManager::connect(&config.database).await?;
    if config.database.run_migrations {
        DatabaseManager::migrate(&pool).await?;
    }

    let objects = FilesystemStore::new(&config.storage.root)
        .await
        .with_context(|| format!("failed to open storage root {}", config.storage.root.display()))?;
    tracing::info!("Object storage at {}", objects.root().display());

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let state = AppState::new(
        Arc::new(PgWorkspaceStore::new(pool)),
        Arc::new(objects),
        config,
    );

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Teamspace API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
