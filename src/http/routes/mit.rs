use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};

use super::LimitQuery;
use crate::error::AppError;
use crate::http::AppState;
use crate::models::mit::{MitHistoryResponse, MitTaskRecord, MitTaskUpsert};

const DEFAULT_HISTORY_LIMIT: usize = 30;

/// GET /api/mit/today. 404 when no task is set for today.
async fn today(State(state): State<Arc<AppState>>) -> Result<Json<MitTaskRecord>, AppError> {
    state.mit.today_task()?.map(Json).ok_or_else(AppError::not_found)
}

/// PUT /api/mit/today. Sets or replaces today's task text.
async fn set_today(
    State(state): State<Arc<AppState>>,
    Json(body): Json<MitTaskUpsert>,
) -> Result<Json<MitTaskRecord>, AppError> {
    Ok(Json(state.mit.set_today_task(&body.task_text)?))
}

/// POST /api/mit/today/toggle
async fn toggle_today(State(state): State<Arc<AppState>>) -> Result<Json<MitTaskRecord>, AppError> {
    Ok(Json(state.mit.toggle_today()?))
}

/// GET /api/mit?limit=N
async fn history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<MitHistoryResponse>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 365);
    Ok(Json(state.mit.history(limit)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/mit", get(history))
        .route("/mit/today", get(today).put(set_today))
        .route("/mit/today/toggle", post(toggle_today))
}
