use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use super::LimitQuery;
use crate::error::AppError;
use crate::http::AppState;
use crate::models::output::{
    OutputEntryRecord, OutputEntryUpsert, OutputHistoryResponse, OutputTypeInsert,
    OutputTypeRecord,
};

const DEFAULT_HISTORY_LIMIT: usize = 30;

/// GET /api/outputs/types
async fn list_types(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OutputTypeRecord>>, AppError> {
    Ok(Json(state.outputs.list_types()?))
}

/// POST /api/outputs/types. Duplicate name is a 409.
async fn create_type(
    State(state): State<Arc<AppState>>,
    Json(body): Json<OutputTypeInsert>,
) -> Result<(StatusCode, Json<OutputTypeRecord>), AppError> {
    let record = state.outputs.create_type(&body)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// DELETE /api/outputs/types/{id}. Entries go with the type.
async fn delete_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.outputs.delete_type(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/outputs/types/{id}/entries. Upserts one day's count and stamps
/// completion against the type's daily target.
async fn log_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<OutputEntryUpsert>,
) -> Result<Json<OutputEntryRecord>, AppError> {
    Ok(Json(state.outputs.log_entry(id, &body)?))
}

/// GET /api/outputs/types/{id}/entries?limit=N
async fn entry_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<OutputHistoryResponse>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 365);
    Ok(Json(state.outputs.history(id, limit)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/outputs/types", get(list_types).post(create_type))
        .route("/outputs/types/{id}", axum::routing::delete(delete_type))
        .route(
            "/outputs/types/{id}/entries",
            post(log_entry).get(entry_history),
        )
}
