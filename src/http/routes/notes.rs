use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::db::repositories::note_repository::NoteRepository;
use crate::error::AppError;
use crate::http::AppState;
use crate::models::note::{NoteInsert, NoteRecord, NoteUpdate};

/// GET /api/notes. Pinned notes first, then newest.
async fn list_notes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<NoteRecord>>, AppError> {
    let notes = state.db.with_connection(NoteRepository::list_all)?;
    Ok(Json(notes))
}

/// POST /api/notes
async fn create_note(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NoteInsert>,
) -> Result<(StatusCode, Json<NoteRecord>), AppError> {
    if body.title.trim().is_empty() {
        return Err(AppError::validation("note title must not be empty"));
    }
    let note = state
        .db
        .with_connection(|conn| NoteRepository::insert(conn, &body))?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /api/notes/{id}
async fn get_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<NoteRecord>, AppError> {
    state
        .db
        .with_connection(|conn| NoteRepository::find_by_id(conn, id))?
        .map(Json)
        .ok_or_else(AppError::not_found)
}

/// PATCH /api/notes/{id}
async fn update_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<NoteUpdate>,
) -> Result<Json<NoteRecord>, AppError> {
    if let Some(title) = &body.title {
        if title.trim().is_empty() {
            return Err(AppError::validation("note title must not be empty"));
        }
    }
    let note = state
        .db
        .with_connection(|conn| NoteRepository::update(conn, id, &body))?;
    Ok(Json(note))
}

/// DELETE /api/notes/{id}
async fn delete_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .db
        .with_connection(|conn| NoteRepository::delete(conn, id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route(
            "/notes/{id}",
            get(get_note).patch(update_note).delete(delete_note),
        )
}
