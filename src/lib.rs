pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::http::AppState;

/// Bring the server up from environment configuration and serve until the
/// listener is torn down.
pub async fn run() -> AppResult<()> {
    let config = AppConfig::from_env()?;

    std::fs::create_dir_all(&config.data_dir)?;
    crate::utils::logger::init_logging(&config.data_dir)?;

    let pool = DbPool::new(config.database_path())?;
    let state = Arc::new(AppState::new(&config, pool)?);
    let app = crate::http::create_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|err| AppError::other(format!("failed to bind {}: {err}", config.bind_addr)))?;
    info!(addr = %config.bind_addr, tz = %config.timezone, "daystack listening");

    axum::serve(listener, app)
        .await
        .map_err(|err| AppError::other(format!("server error: {err}")))?;

    Ok(())
}
