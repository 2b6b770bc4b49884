use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use super::LimitQuery;
use crate::error::AppError;
use crate::http::AppState;
use crate::models::streak::{SeriesHistoryResponse, StreakSummary};

const DEFAULT_HISTORY_LIMIT: usize = 30;
const MAX_HISTORY_LIMIT: usize = 365;

/// GET /api/series/{name}/streak
async fn series_streak(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<StreakSummary>, AppError> {
    Ok(Json(state.series.streak_summary(&name)?))
}

/// GET /api/series/{name}/history?limit=N
async fn series_history(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<SeriesHistoryResponse>, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    Ok(Json(state.series.history(&name, limit)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/series/{name}/streak", get(series_streak))
        .route("/series/{name}/history", get(series_history))
}
