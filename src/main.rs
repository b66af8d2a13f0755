//! Certificate statistics server
//!
//! Serves the record / list / reset endpoints for certificate downloads.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use certificate_stats::{
    config::{self, redact_url},
    create_router, db,
    store::PgStore,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging (JSON lines in production)
    let fmt_layer = if config.is_production() {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "certificate_stats=debug,tower_http=debug".into()))
        .with(fmt_layer)
        .init();

    tracing::info!("Certificate stats server starting ({})...", config.environment);

    let state = match &config.storage {
        Ok(storage) => {
            tracing::info!("Database: {}", redact_url(&storage.url));

            let pool = db::create_pool(storage)
                .await
                .context("Failed to create database pool")?;

            tracing::info!("Running database migrations...");
            db::run_migrations(&pool)
                .await
                .context("Failed to run migrations")?;

            AppState::new(Arc::new(PgStore::new(pool)), config.clone())
        }
        Err(e) => {
            tracing::warn!("{}; every endpoint will answer with a configuration error", e);
            AppState::unconfigured(e.clone(), config.clone())
        }
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
