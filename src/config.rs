use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use tracing::warn;

use crate::error::{AppError, AppResult};

const DEFAULT_PORT: u16 = 4280;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DASHBOARD_CACHE_TTL_SECS: u64 = 600;
const DEFAULT_INSIGHT_CACHE_TTL_SECS: u64 = 7 * 24 * 3600;
const DEFAULT_INSIGHT_CACHE_CAPACITY: usize = 128;

/// Runtime configuration, environment-only.
///
/// The reference time zone is explicit state, never implied by the host:
/// every "today" used by streak computations comes from `timezone`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub timezone: Tz,
    pub http_timeout: Duration,
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_timeout: Duration,
    pub insight_cache_ttl: Duration,
    pub insight_cache_capacity: usize,
    pub weather_base_url: String,
    pub weather_latitude: f64,
    pub weather_longitude: f64,
    pub news_api_key: Option<String>,
    pub news_base_url: String,
    pub quotes_base_url: String,
    pub dashboard_cache_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let port = match std::env::var("DAYSTACK_PORT").ok() {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::validation(format!("invalid DAYSTACK_PORT: {raw}")))?,
            None => DEFAULT_PORT,
        };
        let bind_addr = SocketAddr::from(([127, 0, 0, 1], port));

        let data_dir = match std::env::var("DAYSTACK_DATA_DIR").ok() {
            Some(raw) => PathBuf::from(raw),
            None => default_data_dir(),
        };

        let timezone = match std::env::var("DAYSTACK_TZ").ok() {
            Some(raw) => raw
                .parse::<Tz>()
                .map_err(|_| AppError::validation(format!("invalid DAYSTACK_TZ: {raw}")))?,
            None => {
                warn!(target: "app::config", "DAYSTACK_TZ not set, defaulting to UTC");
                Tz::UTC
            }
        };

        let llm_api_key = non_empty(std::env::var("DAYSTACK_LLM_API_KEY").ok());
        let llm_base_url = std::env::var("DAYSTACK_LLM_BASE_URL")
            .ok()
            .unwrap_or_else(|| "https://api.deepseek.com".to_string());
        let llm_model = std::env::var("DAYSTACK_LLM_MODEL")
            .ok()
            .unwrap_or_else(|| "deepseek-chat".to_string());

        let weather_base_url = std::env::var("DAYSTACK_WEATHER_BASE_URL")
            .ok()
            .unwrap_or_else(|| "https://api.open-meteo.com".to_string());
        let weather_latitude = parse_env_f64("DAYSTACK_WEATHER_LAT", 0.0)?;
        let weather_longitude = parse_env_f64("DAYSTACK_WEATHER_LON", 0.0)?;

        let news_api_key = non_empty(std::env::var("DAYSTACK_NEWS_API_KEY").ok());
        let news_base_url = std::env::var("DAYSTACK_NEWS_BASE_URL")
            .ok()
            .unwrap_or_else(|| "https://newsapi.org".to_string());
        let quotes_base_url = std::env::var("DAYSTACK_QUOTES_BASE_URL")
            .ok()
            .unwrap_or_else(|| "https://api.quotable.io".to_string());

        Ok(Self {
            bind_addr,
            data_dir,
            timezone,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            llm_api_key,
            llm_base_url,
            llm_model,
            llm_timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            insight_cache_ttl: Duration::from_secs(DEFAULT_INSIGHT_CACHE_TTL_SECS),
            insight_cache_capacity: DEFAULT_INSIGHT_CACHE_CAPACITY,
            weather_base_url,
            weather_latitude,
            weather_longitude,
            news_api_key,
            news_base_url,
            quotes_base_url,
            dashboard_cache_ttl: Duration::from_secs(DEFAULT_DASHBOARD_CACHE_TTL_SECS),
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("daystack.sqlite")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("daystack")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn parse_env_f64(key: &str, default: f64) -> AppResult<f64> {
    match std::env::var(key).ok() {
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|_| AppError::validation(format!("invalid {key}: {raw}"))),
        None => Ok(default),
    }
}
