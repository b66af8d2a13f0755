//! Database module - PostgreSQL connection and migrations

use std::str::FromStr;

use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};

use crate::config::StorageConfig;

/// Create database connection pool.
///
/// The privileged key is applied as the role password on top of the URL.
pub async fn create_pool(storage: &StorageConfig) -> Result<PgPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(&storage.url)?
        .password(&storage.service_key);

    PgPoolOptions::new()
        .max_connections(storage.max_connections)
        .connect_with(options)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await?;

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
-- One row per completed certificate export
CREATE TABLE IF NOT EXISTS downloads (
    id BIGSERIAL PRIMARY KEY,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    certificate_type TEXT NOT NULL,
    file_format TEXT NOT NULL,
    student_name TEXT NOT NULL,
    school_name TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_downloads_created ON downloads(created_at);
"#;
