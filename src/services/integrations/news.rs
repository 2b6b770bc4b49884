use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use super::TtlSlot;
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::models::integrations::{NewsDigest, NewsHeadline};

const HEADLINE_LIMIT: usize = 5;

/// Top-headlines adapter. Requires an API key; without one the digest
/// endpoint reports not-configured instead of failing mid-request.
pub struct NewsService {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    cache: TtlSlot<NewsDigest>,
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    title: String,
    source: NewsApiSource,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

impl NewsService {
    pub fn new(config: &AppConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: config.news_base_url.trim_end_matches('/').to_string(),
            api_key: config.news_api_key.clone(),
            cache: TtlSlot::new(config.dashboard_cache_ttl),
        }
    }

    pub async fn digest(&self) -> AppResult<NewsDigest> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| AppError::not_configured("news"))?;

        if let Some(cached) = self.cache.get() {
            debug!(target: "app::integrations", "news served from cache");
            return Ok(cached);
        }

        let url = format!("{}/v2/top-headlines?country=us", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", api_key)
            .send()
            .await
            .map_err(|err| AppError::upstream("news", format!("request failed: {err}")))?;

        if !response.status().is_success() {
            return Err(AppError::upstream(
                "news",
                format!("upstream returned {}", response.status()),
            ));
        }

        let body: NewsApiResponse = response
            .json()
            .await
            .map_err(|err| AppError::upstream("news", format!("invalid payload: {err}")))?;

        let headlines = body
            .articles
            .into_iter()
            .take(HEADLINE_LIMIT)
            .map(|article| NewsHeadline {
                title: article.title,
                source: article.source.name,
                url: article.url,
            })
            .collect();

        let digest = NewsDigest {
            headlines,
            fetched_at: Utc::now().to_rfc3339(),
        };
        self.cache.put(digest.clone());
        Ok(digest)
    }
}
