use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::db::repositories::reminder_repository::ReminderRepository;
use crate::error::AppError;
use crate::http::AppState;
use crate::models::reminder::{ReminderInsert, ReminderRecord, ReminderUpdate};

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    include_completed: bool,
}

/// GET /api/reminders. Pending only unless `?include_completed=true`.
async fn list_reminders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ReminderRecord>>, AppError> {
    let reminders = state.db.with_connection(|conn| {
        if query.include_completed {
            ReminderRepository::list_all(conn)
        } else {
            ReminderRepository::list_pending(conn)
        }
    })?;
    Ok(Json(reminders))
}

/// POST /api/reminders
async fn create_reminder(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ReminderInsert>,
) -> Result<(StatusCode, Json<ReminderRecord>), AppError> {
    if body.text.trim().is_empty() {
        return Err(AppError::validation("reminder text must not be empty"));
    }
    let reminder = state
        .db
        .with_connection(|conn| ReminderRepository::insert(conn, &body))?;
    Ok((StatusCode::CREATED, Json(reminder)))
}

/// PATCH /api/reminders/{id}
async fn update_reminder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<ReminderUpdate>,
) -> Result<Json<ReminderRecord>, AppError> {
    if let Some(text) = &body.text {
        if text.trim().is_empty() {
            return Err(AppError::validation("reminder text must not be empty"));
        }
    }
    let reminder = state
        .db
        .with_connection(|conn| ReminderRepository::update(conn, id, &body))?;
    Ok(Json(reminder))
}

/// DELETE /api/reminders/{id}
async fn delete_reminder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .db
        .with_connection(|conn| ReminderRepository::delete(conn, id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reminders", get(list_reminders).post(create_reminder))
        .route(
            "/reminders/{id}",
            axum::routing::patch(update_reminder).delete(delete_reminder),
        )
}
