use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use super::TtlSlot;
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::models::integrations::WeatherReport;

/// Open-Meteo current-conditions adapter. Key-free upstream, so this is
/// always configured; failures surface as 502 rather than falling back to
/// stale or invented readings.
pub struct WeatherService {
    client: reqwest::Client,
    base_url: String,
    latitude: f64,
    longitude: f64,
    cache: TtlSlot<WeatherReport>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    current_weather: OpenMeteoCurrent,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoCurrent {
    temperature: f64,
    windspeed: f64,
    weathercode: i64,
}

impl WeatherService {
    pub fn new(config: &AppConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: config.weather_base_url.trim_end_matches('/').to_string(),
            latitude: config.weather_latitude,
            longitude: config.weather_longitude,
            cache: TtlSlot::new(config.dashboard_cache_ttl),
        }
    }

    pub async fn current(&self) -> AppResult<WeatherReport> {
        if let Some(cached) = self.cache.get() {
            debug!(target: "app::integrations", "weather served from cache");
            return Ok(cached);
        }

        let url = format!(
            "{}/v1/forecast?latitude={}&longitude={}&current_weather=true",
            self.base_url, self.latitude, self.longitude
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| AppError::upstream("weather", format!("request failed: {err}")))?;

        if !response.status().is_success() {
            return Err(AppError::upstream(
                "weather",
                format!("upstream returned {}", response.status()),
            ));
        }

        let body: OpenMeteoResponse = response
            .json()
            .await
            .map_err(|err| AppError::upstream("weather", format!("invalid payload: {err}")))?;

        let report = WeatherReport {
            temperature_c: body.current_weather.temperature,
            wind_speed_kmh: body.current_weather.windspeed,
            weather_code: body.current_weather.weathercode,
            fetched_at: Utc::now().to_rfc3339(),
        };
        self.cache.put(report.clone());
        Ok(report)
    }
}
