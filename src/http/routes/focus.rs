use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::LimitQuery;
use crate::db::repositories::focus_repository::FocusRepository;
use crate::error::AppError;
use crate::http::AppState;
use crate::models::focus::{FocusDayTotals, FocusSessionInsert, FocusSessionRecord};

const DEFAULT_SESSION_LIMIT: usize = 30;
const DEFAULT_DAILY_DAYS: usize = 14;

#[derive(Debug, Deserialize)]
struct DailyQuery {
    days: Option<usize>,
}

/// GET /api/focus/sessions?limit=N
async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<FocusSessionRecord>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_SESSION_LIMIT).clamp(1, 365);
    let sessions = state
        .db
        .with_connection(|conn| FocusRepository::list_recent(conn, limit))?;
    Ok(Json(sessions))
}

/// POST /api/focus/sessions
async fn record_session(
    State(state): State<Arc<AppState>>,
    Json(body): Json<FocusSessionInsert>,
) -> Result<(StatusCode, Json<FocusSessionRecord>), AppError> {
    if body.planned_minutes <= 0 {
        return Err(AppError::validation("planned_minutes must be positive"));
    }
    if body.actual_minutes < 0 {
        return Err(AppError::validation("actual_minutes must not be negative"));
    }
    let session = state
        .db
        .with_connection(|conn| FocusRepository::insert(conn, &body))?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/focus/daily?days=N. Per-day session and minute totals.
async fn daily_totals(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DailyQuery>,
) -> Result<Json<Vec<FocusDayTotals>>, AppError> {
    let days = query.days.unwrap_or(DEFAULT_DAILY_DAYS).clamp(1, 365);
    let totals = state
        .db
        .with_connection(|conn| FocusRepository::daily_totals(conn, days))?;
    Ok(Json(totals))
}

/// DELETE /api/focus/sessions/{id}
async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .db
        .with_connection(|conn| FocusRepository::delete(conn, id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/focus/sessions", get(list_sessions).post(record_session))
        .route("/focus/sessions/{id}", axum::routing::delete(delete_session))
        .route("/focus/daily", get(daily_totals))
}
