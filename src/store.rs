//! Record store - the single `downloads` table behind an async capability

use axum::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::{DownloadEvent, NewDownload};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    /// Failure reported by a store that does not speak SQL
    #[error("{0}")]
    Backend(String),
}

/// Insert / select-all / delete-all over download events.
///
/// Each operation is a single atomic statement against the backend.
#[async_trait]
pub trait DownloadStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    /// Append one event. Never deduplicates.
    async fn insert(&self, data: NewDownload) -> Result<DownloadEvent, StoreError>;

    /// All events, `created_at` descending (ties by `id` descending).
    async fn list_newest_first(&self) -> Result<Vec<DownloadEvent>, StoreError>;

    /// Delete every event, returning how many were removed.
    async fn clear(&self) -> Result<u64, StoreError>;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DownloadStore for PgStore {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, data: NewDownload) -> Result<DownloadEvent, StoreError> {
        Ok(DownloadEvent::create(&self.pool, &data).await?)
    }

    async fn list_newest_first(&self) -> Result<Vec<DownloadEvent>, StoreError> {
        Ok(DownloadEvent::list_newest_first(&self.pool).await?)
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        Ok(DownloadEvent::delete_all(&self.pool).await?)
    }
}

/// In-process store for tests and local development.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<MemoryRows>,
}

#[derive(Default)]
struct MemoryRows {
    next_id: i64,
    /// Newest `created_at` among `events`
    last_created_at: Option<DateTime<Utc>>,
    events: Vec<DownloadEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an already-timestamped event (ids keep increasing).
    pub fn push(&self, mut event: DownloadEvent) -> DownloadEvent {
        let mut rows = self.rows.lock();
        rows.next_id = rows.next_id.max(event.id) + 1;
        event.id = rows.next_id;
        rows.last_created_at = rows.last_created_at.max(Some(event.created_at));
        rows.events.push(event.clone());
        event
    }

    pub fn len(&self) -> usize {
        self.rows.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DownloadStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, data: NewDownload) -> Result<DownloadEvent, StoreError> {
        let mut rows = self.rows.lock();
        rows.next_id += 1;

        // Keep creation time monotonic even if the wall clock steps back
        let now = Utc::now();
        let created_at = rows.last_created_at.map_or(now, |latest| latest.max(now));
        rows.last_created_at = Some(created_at);

        let event = DownloadEvent {
            id: rows.next_id,
            created_at,
            certificate_type: data.certificate_type,
            file_format: data.file_format,
            student_name: data.student_name,
            school_name: data.school_name,
        };
        rows.events.push(event.clone());
        Ok(event)
    }

    async fn list_newest_first(&self) -> Result<Vec<DownloadEvent>, StoreError> {
        let mut events = self.rows.lock().events.clone();
        events.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(events)
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        let mut rows = self.rows.lock();
        let removed = rows.events.len() as u64;
        rows.events.clear();
        rows.last_created_at = None;
        Ok(removed)
    }
}
