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
use crate::models::journal::{
    JournalAnalysisResponse, JournalEntryRecord, JournalEntryUpsert,
};

/// GET /api/journal?limit=N
async fn list_entries(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<JournalEntryRecord>>, AppError> {
    Ok(Json(state.journal.list_entries(query.limit)?))
}

/// GET /api/journal/{date}
async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<JournalEntryRecord>, AppError> {
    Ok(Json(state.journal.get_entry(&date)?))
}

/// PUT /api/journal/{date}. Creates or replaces the entry for the date.
async fn upsert_entry(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
    Json(body): Json<JournalEntryUpsert>,
) -> Result<Json<JournalEntryRecord>, AppError> {
    Ok(Json(state.journal.upsert_entry(Some(&date), &body)?))
}

/// DELETE /api/journal/{date}
async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<StatusCode, AppError> {
    state.journal.delete_entry(&date)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/journal/{date}/analysis. Cache-first; 412 when no LLM key is
/// configured.
async fn analyze_entry(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<JournalAnalysisResponse>, AppError> {
    Ok(Json(state.journal.analyze_entry(&date).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/journal", get(list_entries))
        .route(
            "/journal/{date}",
            get(get_entry).put(upsert_entry).delete(delete_entry),
        )
        .route("/journal/{date}/analysis", post(analyze_entry))
}
