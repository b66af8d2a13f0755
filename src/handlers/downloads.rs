//! Download recorder handler

use axum::{body::Bytes, extract::State, Json};

use crate::{AppResult, AppState};
use crate::models::{NewDownload, RecordDownloadResponse};

/// Record one completed export.
///
/// The body is parsed as JSON whatever the `Content-Type`, since browsers
/// post it as plain text.
pub async fn record(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<RecordDownloadResponse>> {
    let store = state.store()?;
    let data: NewDownload = serde_json::from_slice(&body)?;

    let event = store.insert(data).await?;

    tracing::info!(
        "Download recorded: id={} type={} format={}",
        event.id, event.certificate_type, event.file_format
    );

    Ok(Json(RecordDownloadResponse {
        message: "Download recorded".to_string(),
        data: vec![event],
    }))
}
