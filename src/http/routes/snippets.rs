use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::db::repositories::snippet_repository::SnippetRepository;
use crate::error::AppError;
use crate::http::AppState;
use crate::models::snippet::{SnippetInsert, SnippetRecord, SnippetUpdate};

/// GET /api/snippets
async fn list_snippets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SnippetRecord>>, AppError> {
    let snippets = state.db.with_connection(SnippetRepository::list_all)?;
    Ok(Json(snippets))
}

/// POST /api/snippets
async fn create_snippet(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SnippetInsert>,
) -> Result<(StatusCode, Json<SnippetRecord>), AppError> {
    if body.title.trim().is_empty() {
        return Err(AppError::validation("snippet title must not be empty"));
    }
    if body.code.is_empty() {
        return Err(AppError::validation("snippet code must not be empty"));
    }
    let snippet = state
        .db
        .with_connection(|conn| SnippetRepository::insert(conn, &body))?;
    Ok((StatusCode::CREATED, Json(snippet)))
}

/// GET /api/snippets/{id}
async fn get_snippet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SnippetRecord>, AppError> {
    state
        .db
        .with_connection(|conn| SnippetRepository::find_by_id(conn, id))?
        .map(Json)
        .ok_or_else(AppError::not_found)
}

/// PATCH /api/snippets/{id}
async fn update_snippet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<SnippetUpdate>,
) -> Result<Json<SnippetRecord>, AppError> {
    let snippet = state
        .db
        .with_connection(|conn| SnippetRepository::update(conn, id, &body))?;
    Ok(Json(snippet))
}

/// DELETE /api/snippets/{id}
async fn delete_snippet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .db
        .with_connection(|conn| SnippetRepository::delete(conn, id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/snippets", get(list_snippets).post(create_snippet))
        .route(
            "/snippets/{id}",
            get(get_snippet).patch(update_snippet).delete(delete_snippet),
        )
}
