//! API route handlers, one module per resource, all nested under `/api`.

pub mod dashboard;
pub mod focus;
pub mod health;
pub mod journal;
pub mod mit;
pub mod mood;
pub mod notes;
pub mod outputs;
pub mod reminders;
pub mod series;
pub mod snippets;

use std::sync::Arc;

use axum::Router;
use serde::Deserialize;

use crate::http::AppState;

/// Shared `?limit=N` query for the list endpoints.
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", series::router())
        .nest("/api", mit::router())
        .nest("/api", outputs::router())
        .nest("/api", journal::router())
        .nest("/api", notes::router())
        .nest("/api", reminders::router())
        .nest("/api", mood::router())
        .nest("/api", snippets::router())
        .nest("/api", focus::router())
        .nest("/api", dashboard::router())
        .with_state(state)
}
