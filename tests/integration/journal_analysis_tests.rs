//! Integration tests for journal entries and LLM-backed analysis, with the
//! provider mocked at the HTTP boundary.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use daystack::config::AppConfig;
use daystack::db::DbPool;
use daystack::error::{AppError, LlmErrorCode};
use daystack::models::journal::JournalEntryUpsert;
use daystack::services::insight_cache::InsightCache;
use daystack::services::integrations::LlmClient;
use daystack::services::journal_service::JournalService;
use httpmock::prelude::*;
use serde_json::json;
use tempfile::{tempdir, TempDir};

fn test_config(data_dir: &Path, llm_base_url: Option<String>) -> AppConfig {
    AppConfig {
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        data_dir: data_dir.to_path_buf(),
        timezone: Tz::UTC,
        http_timeout: Duration::from_secs(2),
        llm_api_key: llm_base_url.as_ref().map(|_| "test-key".to_string()),
        llm_base_url: llm_base_url.unwrap_or_else(|| "http://127.0.0.1:1".to_string()),
        llm_model: "deepseek-chat".to_string(),
        llm_timeout: Duration::from_secs(2),
        insight_cache_ttl: Duration::from_secs(3600),
        insight_cache_capacity: 16,
        weather_base_url: "http://127.0.0.1:1".to_string(),
        weather_latitude: 0.0,
        weather_longitude: 0.0,
        news_api_key: None,
        news_base_url: "http://127.0.0.1:1".to_string(),
        quotes_base_url: "http://127.0.0.1:1".to_string(),
        dashboard_cache_ttl: Duration::from_secs(600),
    }
}

fn setup(llm_base_url: Option<String>) -> (JournalService, TempDir) {
    let temp_dir = tempdir().expect("temp dir");
    let config = test_config(temp_dir.path(), llm_base_url);
    let db = DbPool::new(temp_dir.path().join("test.db")).expect("test database");
    let llm = LlmClient::try_new(&config).expect("client build").map(Arc::new);
    let insights = InsightCache::new(config.insight_cache_capacity, config.insight_cache_ttl);
    let service = JournalService::new(db, config.timezone, llm, insights);
    (service, temp_dir)
}

fn entry(content: &str) -> JournalEntryUpsert {
    JournalEntryUpsert {
        content: content.to_string(),
        mood: None,
    }
}

#[test]
fn journal_crud_round_trip() {
    let (service, _tmp) = setup(None);

    let saved = service
        .upsert_entry(Some("2026-08-20"), &entry("wrote the parser"))
        .unwrap();
    assert_eq!(saved.entry_date, "2026-08-20");

    let replaced = service
        .upsert_entry(
            Some("2026-08-20"),
            &JournalEntryUpsert {
                content: "wrote the parser, then tests".to_string(),
                mood: Some("good".to_string()),
            },
        )
        .unwrap();
    assert_eq!(replaced.id, saved.id);
    assert_eq!(replaced.mood.as_deref(), Some("good"));

    let listed = service.list_entries(None).unwrap();
    assert_eq!(listed.len(), 1);

    service.delete_entry("2026-08-20").unwrap();
    assert!(matches!(
        service.get_entry("2026-08-20"),
        Err(AppError::NotFound)
    ));
}

#[test]
fn journal_validation_rejects_bad_input() {
    let (service, _tmp) = setup(None);

    assert!(matches!(
        service.upsert_entry(Some("not-a-date"), &entry("text")),
        Err(AppError::Validation { .. })
    ));
    assert!(matches!(
        service.upsert_entry(Some("2026-08-20"), &entry("   ")),
        Err(AppError::Validation { .. })
    ));
}

#[tokio::test]
async fn analysis_without_api_key_is_not_configured() {
    let (service, _tmp) = setup(None);
    service
        .upsert_entry(Some("2026-08-20"), &entry("a quiet day"))
        .unwrap();

    let error = service.analyze_entry("2026-08-20").await.unwrap_err();
    assert!(matches!(error, AppError::NotConfigured(_)));
}

#[tokio::test]
async fn analysis_of_missing_entry_is_not_found() {
    let server = MockServer::start_async().await;
    let (service, _tmp) = setup(Some(server.base_url()));

    let error = service.analyze_entry("2026-08-20").await.unwrap_err();
    assert!(matches!(error, AppError::NotFound));
}

#[tokio::test]
async fn analysis_parses_fenced_output_and_caches_by_content() {
    let server = MockServer::start_async().await;

    let analysis_json = json!({
        "summary": "A productive day centered on deep work.",
        "sentiment": "positive",
        "themes": ["focus", "writing"],
        "suggestions": ["keep the morning block"]
    });
    let fenced = format!("```json\n{}\n```", analysis_json);

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer test-key");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "choices": [{ "message": { "content": fenced } }]
                }));
        })
        .await;

    let (service, _tmp) = setup(Some(server.base_url()));
    service
        .upsert_entry(Some("2026-08-20"), &entry("deep work all morning"))
        .unwrap();

    let first = service.analyze_entry("2026-08-20").await.unwrap();
    assert!(!first.cache_hit);
    assert_eq!(first.analysis.sentiment, "positive");
    assert_eq!(first.analysis.themes, vec!["focus", "writing"]);

    let second = service.analyze_entry("2026-08-20").await.unwrap();
    assert!(second.cache_hit);
    assert_eq!(second.analysis, first.analysis);
    mock.assert_hits_async(1).await;

    // Editing the entry changes the semantic key, so the provider is hit again.
    service
        .upsert_entry(Some("2026-08-20"), &entry("deep work, then a long walk"))
        .unwrap();
    let third = service.analyze_entry("2026-08-20").await.unwrap();
    assert!(!third.cache_hit);
    mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn unparseable_llm_output_is_a_typed_error() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "choices": [{ "message": { "content": "sorry, no structured output" } }]
                }));
        })
        .await;

    let (service, _tmp) = setup(Some(server.base_url()));
    service
        .upsert_entry(Some("2026-08-20"), &entry("some day"))
        .unwrap();

    let error = service.analyze_entry("2026-08-20").await.unwrap_err();
    assert_eq!(error.llm_code(), Some(LlmErrorCode::InvalidResponse));
}

#[tokio::test]
async fn provider_rejection_maps_to_forbidden() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(401).json_body(json!({ "error": "bad key" }));
        })
        .await;

    let (service, _tmp) = setup(Some(server.base_url()));
    service
        .upsert_entry(Some("2026-08-20"), &entry("some day"))
        .unwrap();

    let error = service.analyze_entry("2026-08-20").await.unwrap_err();
    assert_eq!(error.llm_code(), Some(LlmErrorCode::Forbidden));
}
