use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::LimitQuery;
use crate::db::repositories::mood_repository::MoodRepository;
use crate::error::AppError;
use crate::http::AppState;
use crate::models::mood::{MoodSampleInsert, MoodSampleRecord};

const DEFAULT_LIMIT: usize = 30;
const MIN_SCORE: i64 = 1;
const MAX_SCORE: i64 = 5;

/// GET /api/mood?limit=N
async fn list_samples(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<MoodSampleRecord>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 365);
    let samples = state
        .db
        .with_connection(|conn| MoodRepository::list_recent(conn, limit))?;
    Ok(Json(samples))
}

/// POST /api/mood. Score is a 1..=5 scale.
async fn record_sample(
    State(state): State<Arc<AppState>>,
    Json(body): Json<MoodSampleInsert>,
) -> Result<(StatusCode, Json<MoodSampleRecord>), AppError> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&body.score) {
        return Err(AppError::validation(format!(
            "mood score must be between {MIN_SCORE} and {MAX_SCORE}"
        )));
    }
    let sample = state
        .db
        .with_connection(|conn| MoodRepository::insert(conn, &body))?;
    Ok((StatusCode::CREATED, Json(sample)))
}

/// DELETE /api/mood/{id}
async fn delete_sample(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .db
        .with_connection(|conn| MoodRepository::delete(conn, id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/mood", get(list_samples).post(record_sample))
        .route("/mood/{id}", axum::routing::delete(delete_sample))
}
