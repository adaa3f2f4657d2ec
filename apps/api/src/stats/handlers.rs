use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::stats::record::{StatsDisplay, StatsRecord};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: StatsRecord,
    pub display: StatsDisplay,
}

/// GET /api/v1/stats
///
/// Polled by the landing page. Unreadable state reads as zeros; the only
/// error is a failed blocking task.
pub async fn handle_get_stats(
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats_service = state.stats.clone();
    let stats = tokio::task::spawn_blocking(move || stats_service.query())
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in stats query: {e}"))
        })?;

    Ok(Json(StatsResponse {
        display: stats.display(),
        stats,
    }))
}
