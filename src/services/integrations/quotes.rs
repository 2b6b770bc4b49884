use serde::Deserialize;
use tracing::debug;

use super::TtlSlot;
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::models::integrations::Quote;

/// Daily-quote adapter over a Quotable-compatible API. Cached like the
/// other dashboard tiles so the quote stays stable within the window.
pub struct QuoteService {
    client: reqwest::Client,
    base_url: String,
    cache: TtlSlot<Quote>,
}

#[derive(Debug, Deserialize)]
struct QuotableResponse {
    content: String,
    author: String,
}

impl QuoteService {
    pub fn new(config: &AppConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: config.quotes_base_url.trim_end_matches('/').to_string(),
            cache: TtlSlot::new(config.dashboard_cache_ttl),
        }
    }

    pub async fn random(&self) -> AppResult<Quote> {
        if let Some(cached) = self.cache.get() {
            debug!(target: "app::integrations", "quote served from cache");
            return Ok(cached);
        }

        let url = format!("{}/random", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| AppError::upstream("quotes", format!("request failed: {err}")))?;

        if !response.status().is_success() {
            return Err(AppError::upstream(
                "quotes",
                format!("upstream returned {}", response.status()),
            ));
        }

        let body: QuotableResponse = response
            .json()
            .await
            .map_err(|err| AppError::upstream("quotes", format!("invalid payload: {err}")))?;

        let quote = Quote {
            content: body.content,
            author: body.author,
        };
        self.cache.put(quote.clone());
        Ok(quote)
    }
}
