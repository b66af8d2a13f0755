//! Statistics handlers

use axum::{extract::State, Json};

use crate::{AppResult, AppState};
use crate::models::{DownloadEvent, MessageResponse};

/// All recorded downloads, newest first
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<DownloadEvent>>> {
    let events = state.store()?.list_newest_first().await?;
    tracing::debug!("Statistics listed: {} events", events.len());
    Ok(Json(events))
}

/// Delete every recorded download
pub async fn reset(
    State(state): State<AppState>,
) -> AppResult<Json<MessageResponse>> {
    let removed = state.store()?.clear().await?;

    tracing::warn!("Download history reset: {} events removed", removed);

    Ok(Json(MessageResponse {
        message: "History reset successfully".to_string(),
    }))
}
