use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::error::AppError;
use crate::http::AppState;
use crate::models::integrations::{NewsDigest, Quote, WeatherReport};

/// GET /api/dashboard/weather
async fn weather(State(state): State<Arc<AppState>>) -> Result<Json<WeatherReport>, AppError> {
    Ok(Json(state.weather.current().await?))
}

/// GET /api/dashboard/news. 412 until a news API key is configured.
async fn news(State(state): State<Arc<AppState>>) -> Result<Json<NewsDigest>, AppError> {
    Ok(Json(state.news.digest().await?))
}

/// GET /api/dashboard/quote
async fn quote(State(state): State<Arc<AppState>>) -> Result<Json<Quote>, AppError> {
    Ok(Json(state.quotes.random().await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard/weather", get(weather))
        .route("/dashboard/news", get(news))
        .route("/dashboard/quote", get(quote))
}
