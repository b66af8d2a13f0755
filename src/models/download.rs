//! Download event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// One completed certificate export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DownloadEvent {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub certificate_type: String,
    pub file_format: String,
    pub student_name: String,
    pub school_name: String,
}

/// Caller-supplied part of a download event. Values are stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDownload {
    pub certificate_type: String,
    pub file_format: String,
    pub student_name: String,
    pub school_name: String,
}

/// Response of the record endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordDownloadResponse {
    pub message: String,
    pub data: Vec<DownloadEvent>,
}

/// Response of the reset endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl DownloadEvent {
    pub async fn create(pool: &PgPool, data: &NewDownload) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, DownloadEvent>(
            r#"
            INSERT INTO downloads (certificate_type, file_format, student_name, school_name)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#
        )
        .bind(&data.certificate_type)
        .bind(&data.file_format)
        .bind(&data.student_name)
        .bind(&data.school_name)
        .fetch_one(pool)
        .await
    }

    pub async fn list_newest_first(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, DownloadEvent>(
            "SELECT * FROM downloads ORDER BY created_at DESC, id DESC"
        )
        .fetch_all(pool)
        .await
    }

    /// Remove every row. Returns how many were deleted.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM downloads")
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
