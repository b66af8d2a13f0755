//! Certificate Generator Backend
//!
//! Download statistics service plus the export glue used by the
//! certificate generator front end.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    CERTIFICATE STATS                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────────┐   ┌───────────────┐   ┌────────────────┐ │
//! │  │ export (PNG,   │──▶│ StatsClient   │──▶│ HTTP handlers  │ │
//! │  │ PDF, CSV)      │   │ (reqwest)     │   │ (Axum)         │ │
//! │  └────────────────┘   └───────────────┘   └───────┬────────┘ │
//! │  ┌────────────────┐                               ▼          │
//! │  │ console (admin │                       ┌──────────────┐   │
//! │  │ state machine) │                       │ DownloadStore│   │
//! │  └────────────────┘                       │ (PostgreSQL) │   │
//! │                                           └──────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod db;
pub mod models;
pub mod store;
pub mod handlers;
pub mod error;
pub mod client;
pub mod export;
pub mod console;

use std::sync::Arc;

use axum::{
    Router,
    routing::{any, get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use error::{AppError, AppResult};

use config::{Config, ConfigError};
use store::DownloadStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    store: Result<Arc<dyn DownloadStore>, ConfigError>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn DownloadStore>, config: Config) -> Self {
        Self { store: Ok(store), config }
    }

    /// State whose every storage access fails with a configuration error.
    pub fn unconfigured(reason: ConfigError, config: Config) -> Self {
        Self { store: Err(reason), config }
    }

    /// The configured store, or the configuration error for this request.
    pub fn store(&self) -> AppResult<&dyn DownloadStore> {
        self.store
            .as_deref()
            .map_err(|e| AppError::Configuration(e.to_string()))
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route(
            "/api/record-download",
            post(handlers::downloads::record).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/get-statistics",
            any(handlers::statistics::list),
        )
        .route(
            "/api/reset-statistics",
            post(handlers::statistics::reset).fallback(handlers::method_not_allowed),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
