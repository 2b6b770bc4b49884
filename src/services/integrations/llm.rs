use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde_json::{json, Value as JsonValue};
use tokio::time::sleep;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult, LlmErrorCode};
use crate::models::journal::JournalAnalysis;

const ANALYSIS_SYSTEM_PROMPT: &str = "You are a reflective journaling assistant. \
Given one journal entry, respond with a JSON object containing exactly these \
fields: \"summary\" (one or two sentences), \"sentiment\" (one of \"positive\", \
\"neutral\", \"negative\"), \"themes\" (array of short strings), and \
\"suggestions\" (array of short strings). Respond with JSON only.";

const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// OpenAI-compatible chat-completions client used for journal analysis.
/// Constructed only when an API key is configured.
pub struct LlmClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl LlmClient {
    pub fn try_new(config: &AppConfig) -> AppResult<Option<Self>> {
        let api_key = match &config.llm_api_key {
            Some(key) => key.clone(),
            None => return Ok(None),
        };

        let client = reqwest::Client::builder()
            .timeout(config.llm_timeout)
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .map_err(|err| AppError::other(format!("failed to build LLM HTTP client: {err}")))?;

        let base_url = config.llm_base_url.trim_end_matches('/').to_string();
        let endpoint = format!("{}/v1/chat/completions", base_url);

        Ok(Some(Self {
            client,
            api_key,
            endpoint,
            model: config.llm_model.clone(),
        }))
    }

    pub async fn analyze_journal(&self, content: &str) -> AppResult<JournalAnalysis> {
        let correlation_id = Uuid::new_v4().to_string();
        let request_body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": ANALYSIS_SYSTEM_PROMPT },
                { "role": "user", "content": content },
            ],
            "temperature": ANALYSIS_TEMPERATURE,
            "response_format": { "type": "json_object" },
        });

        let backoff_schedule = [Duration::from_secs(0), Duration::from_secs(1)];
        let mut last_error: Option<AppError> = None;

        for (attempt, delay) in backoff_schedule.iter().enumerate() {
            if *delay > Duration::from_secs(0) {
                sleep(*delay).await;
            }

            debug!(
                target: "app::llm",
                attempt = attempt + 1,
                correlation_id = %correlation_id,
                "invoking journal analysis"
            );

            let start = Instant::now();
            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await;

            match response {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let body: JsonValue = resp.json().await.map_err(|err| {
                            AppError::llm_with_details(
                                LlmErrorCode::InvalidResponse,
                                format!("failed to read LLM response body: {err}"),
                                Some(&correlation_id),
                                None,
                            )
                        })?;

                        let content = body["choices"][0]["message"]["content"]
                            .as_str()
                            .ok_or_else(|| {
                                AppError::llm_with_details(
                                    LlmErrorCode::InvalidResponse,
                                    "LLM response missing message content",
                                    Some(&correlation_id),
                                    Some(json!({ "reason": "missing_message_content" })),
                                )
                            })?;

                        debug!(
                            target: "app::llm",
                            correlation_id = %correlation_id,
                            latency_ms = start.elapsed().as_millis() as u64,
                            "journal analysis returned"
                        );

                        return parse_analysis(content, &correlation_id);
                    }

                    let (error, retryable) = map_http_error(status, &correlation_id);
                    if !retryable {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
                Err(err) => {
                    let (error, retryable) = error_from_reqwest(err, &correlation_id);
                    if !retryable {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AppError::llm(LlmErrorCode::Unknown, "journal analysis failed without a cause")
        }))
    }
}

/// Parse model output into the analysis shape, repairing the usual damage
/// first. A failure after repair is a typed error, never a made-up analysis.
fn parse_analysis(content: &str, correlation_id: &str) -> AppResult<JournalAnalysis> {
    let repaired = repair_json(content);

    let value: JsonValue = serde_json::from_str(&repaired).map_err(|err| {
        AppError::llm_with_details(
            LlmErrorCode::InvalidResponse,
            format!("LLM returned unparseable JSON: {err}"),
            Some(correlation_id),
            Some(json!({ "reason": "invalid_json" })),
        )
    })?;

    serde_json::from_value(value).map_err(|err| {
        AppError::llm_with_details(
            LlmErrorCode::InvalidResponse,
            format!("LLM analysis missing required fields: {err}"),
            Some(correlation_id),
            Some(json!({ "reason": "schema_mismatch" })),
        )
    })
}

/// Best-effort repair of brittle model output: strip markdown fences, trim
/// chatter outside the outermost object, and close unterminated brackets
/// from truncated responses. Strings are tracked so braces inside values
/// do not confuse the balancer.
pub fn repair_json(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(stripped) = text.strip_prefix("```json") {
        text = stripped;
    } else if let Some(stripped) = text.strip_prefix("```") {
        text = stripped;
    }
    if let Some(stripped) = text.strip_suffix("```") {
        text = stripped;
    }
    let text = text.trim();

    let start = match text.find('{') {
        Some(index) => index,
        None => return text.to_string(),
    };
    let candidate = match text.rfind('}') {
        Some(end) if end > start => &text[start..=end],
        _ => &text[start..],
    };

    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    for ch in candidate.chars() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                stack.pop();
            }
            _ => {}
        }
    }

    let mut repaired = candidate.to_string();
    if in_string {
        repaired.push('"');
    }
    while let Some(closer) = stack.pop() {
        repaired.push(closer);
    }

    repaired
}

fn map_http_error(status: StatusCode, correlation_id: &str) -> (AppError, bool) {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => (
            AppError::llm_with_details(
                LlmErrorCode::Forbidden,
                "LLM provider rejected the API key",
                Some(correlation_id),
                None,
            ),
            false,
        ),
        StatusCode::TOO_MANY_REQUESTS => (
            AppError::llm_with_details(
                LlmErrorCode::RateLimited,
                "LLM provider rate limit reached",
                Some(correlation_id),
                None,
            ),
            true,
        ),
        StatusCode::BAD_REQUEST => (
            AppError::llm_with_details(
                LlmErrorCode::InvalidRequest,
                "LLM provider rejected the request",
                Some(correlation_id),
                None,
            ),
            false,
        ),
        status if status.is_server_error() => (
            AppError::llm_with_details(
                LlmErrorCode::ProviderUnavailable,
                format!("LLM provider unavailable ({status})"),
                Some(correlation_id),
                None,
            ),
            true,
        ),
        status => (
            AppError::llm_with_details(
                LlmErrorCode::Unknown,
                format!("unexpected LLM provider status {status}"),
                Some(correlation_id),
                None,
            ),
            false,
        ),
    }
}

fn error_from_reqwest(err: reqwest::Error, correlation_id: &str) -> (AppError, bool) {
    if err.is_timeout() {
        (
            AppError::llm_with_details(
                LlmErrorCode::HttpTimeout,
                "LLM request timed out",
                Some(correlation_id),
                None,
            ),
            true,
        )
    } else {
        warn!(target: "app::llm", error = %err, "LLM transport error");
        (
            AppError::llm_with_details(
                LlmErrorCode::ProviderUnavailable,
                format!("LLM transport error: {err}"),
                Some(correlation_id),
                None,
            ),
            true,
        )
    }
}
