use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::services::insight_cache::InsightCache;
use crate::services::integrations::{LlmClient, NewsService, QuoteService, WeatherService};
use crate::services::journal_service::JournalService;
use crate::services::mit_service::MitService;
use crate::services::output_service::OutputService;
use crate::services::series_service::SeriesService;

pub mod routes;

/// Shared handler state. Services own a cloned database handle each;
/// connections are opened per call, so the state itself stays lock-free.
pub struct AppState {
    pub db: DbPool,
    pub series: SeriesService,
    pub mit: MitService,
    pub outputs: OutputService,
    pub journal: JournalService,
    pub weather: WeatherService,
    pub news: NewsService,
    pub quotes: QuoteService,
    started_at: Instant,
}

impl AppState {
    pub fn new(config: &AppConfig, db: DbPool) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|err| AppError::other(format!("failed to build HTTP client: {err}")))?;

        let llm = LlmClient::try_new(config)?.map(Arc::new);
        let insights = InsightCache::new(config.insight_cache_capacity, config.insight_cache_ttl);

        Ok(Self {
            series: SeriesService::new(db.clone(), config.timezone),
            mit: MitService::new(db.clone(), config.timezone),
            outputs: OutputService::new(db.clone(), config.timezone),
            journal: JournalService::new(db.clone(), config.timezone, llm, insights),
            weather: WeatherService::new(config, http_client.clone()),
            news: NewsService::new(config, http_client.clone()),
            quotes: QuoteService::new(config, http_client),
            db,
            started_at: Instant::now(),
        })
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Full application router: API routes plus CORS and request tracing.
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::api_routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
