use anyhow::Context;
use tracing_subscriber::EnvFilter;

use igs_api::auth::CredentialStore;
use igs_api::config::AppConfig;
use igs_api::{app, database, ingest, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("igs_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();
    config.validate()?;
    tracing::info!("Starting IGS API in {:?} mode", config.environment);

    let pool = database::connect(&config.database)
        .await
        .with_context(|| format!("failed to open {}", config.database.url))?;

    if config.ingest.on_startup {
        let inserted = ingest::ingest(&pool, &config.ingest.sources())
            .await
            .context("startup ingestion failed")?;
        tracing::info!("Startup ingestion inserted {} tracts", inserted);
    }

    let credentials = CredentialStore::from_config(&config.security)?;
    let state = AppState::new(pool, credentials, &config.security)?;

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("IGS API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
