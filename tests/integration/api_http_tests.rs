//! End-to-end HTTP tests: real router, real database, requests driven
//! through the service with `oneshot`.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono_tz::Tz;
use daystack::config::AppConfig;
use daystack::db::DbPool;
use daystack::http::{create_app, AppState};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

fn test_config(data_dir: &Path) -> AppConfig {
    AppConfig {
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        data_dir: data_dir.to_path_buf(),
        timezone: Tz::UTC,
        http_timeout: Duration::from_secs(2),
        llm_api_key: None,
        llm_base_url: "http://127.0.0.1:1".to_string(),
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

fn test_app() -> (Router, TempDir) {
    let temp_dir = tempdir().expect("temp dir");
    let config = test_config(temp_dir.path());
    let db = DbPool::new(temp_dir.path().join("test.db")).expect("test database");
    let state = Arc::new(AppState::new(&config, db).expect("app state"));
    (create_app(state), temp_dir)
}

async fn request(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _tmp) = test_app();
    let (status, body) = request(&app, Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn mit_today_lifecycle_over_http() {
    let (app, _tmp) = test_app();

    let (status, _) = request(&app, Method::GET, "/api/mit/today", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = request(
        &app,
        Method::PUT,
        "/api/mit/today",
        Some(json!({ "task_text": "ship the release" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task_text"], "ship the release");
    assert_eq!(body["completed"], json!(false));

    let (status, body) = request(&app, Method::POST, "/api/mit/today/toggle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completed"], json!(true));

    let (status, body) = request(&app, Method::GET, "/api/mit?limit=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(body["current_streak"], json!(1));
}

#[tokio::test]
async fn mit_validation_produces_structured_400() {
    let (app, _tmp) = test_app();

    let (status, body) = request(
        &app,
        Method::PUT,
        "/api/mit/today",
        Some(json!({ "task_text": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("task_text"));
}

#[tokio::test]
async fn output_type_and_entry_flow_over_http() {
    let (app, _tmp) = test_app();

    let (status, created) = request(
        &app,
        Method::POST,
        "/api/outputs/types",
        Some(json!({ "name": "pages", "unit": "pages", "daily_target": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let type_id = created["id"].as_i64().unwrap();

    let (status, _) = request(
        &app,
        Method::POST,
        "/api/outputs/types",
        Some(json!({ "name": "pages", "unit": "pages", "daily_target": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let uri = format!("/api/outputs/types/{type_id}/entries");
    let (status, entry) = request(&app, Method::POST, &uri, Some(json!({ "count": 4 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["completed"], json!(true));

    let (status, history) =
        request(&app, Method::GET, &format!("{uri}?limit=10"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["current_streak"], json!(1));

    let (status, streak) = request(&app, Method::GET, "/api/series/pages/streak", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(streak["current_streak"], json!(1));
    assert_eq!(streak["last_30_days"].as_array().unwrap().len(), 30);

    let (status, _) = request(
        &app,
        Method::DELETE,
        &format!("/api/outputs/types/{type_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request(&app, Method::GET, "/api/series/pages/streak", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_series_is_404_with_error_body() {
    let (app, _tmp) = test_app();
    let (status, body) = request(&app, Method::GET, "/api/series/ghost/streak", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn mit_series_streak_is_available_without_rows() {
    let (app, _tmp) = test_app();
    let (status, body) = request(&app, Method::GET, "/api/series/mit/streak", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_streak"], json!(0));
    assert_eq!(body["weekly_stats"], json!([]));
}

#[tokio::test]
async fn journal_crud_over_http() {
    let (app, _tmp) = test_app();

    let (status, saved) = request(
        &app,
        Method::PUT,
        "/api/journal/2026-08-20",
        Some(json!({ "content": "long day, good progress", "mood": "tired" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["entry_date"], "2026-08-20");
    assert_eq!(saved["mood"], "tired");

    let (status, fetched) = request(&app, Method::GET, "/api/journal/2026-08-20", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["content"], "long day, good progress");

    let (status, listed) = request(&app, Method::GET, "/api/journal?limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // No LLM key configured, so analysis is a 412 precondition failure.
    let (status, error) = request(
        &app,
        Method::POST,
        "/api/journal/2026-08-20/analysis",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(error["code"], "NOT_CONFIGURED");

    let (status, _) = request(&app, Method::DELETE, "/api/journal/2026-08-20", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request(&app, Method::GET, "/api/journal/2026-08-20", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn notes_crud_over_http() {
    let (app, _tmp) = test_app();

    let (status, note) = request(
        &app,
        Method::POST,
        "/api/notes",
        Some(json!({ "title": "ideas", "content": "try a smaller scope" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = note["id"].as_i64().unwrap();
    assert_eq!(note["pinned"], json!(false));

    let (status, updated) = request(
        &app,
        Method::PATCH,
        &format!("/api/notes/{id}"),
        Some(json!({ "pinned": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["pinned"], json!(true));
    assert_eq!(updated["title"], "ideas");

    let (status, listed) = request(&app, Method::GET, "/api/notes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = request(&app, Method::DELETE, &format!("/api/notes/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn reminders_filter_pending_by_default() {
    let (app, _tmp) = test_app();

    let (_, first) = request(
        &app,
        Method::POST,
        "/api/reminders",
        Some(json!({ "text": "renew domain", "due_at": "2026-09-01T09:00:00Z" })),
    )
    .await;
    let (_, second) = request(
        &app,
        Method::POST,
        "/api/reminders",
        Some(json!({ "text": "water plants" })),
    )
    .await;

    let first_id = first["id"].as_i64().unwrap();
    let _second_id = second["id"].as_i64().unwrap();

    let (status, done) = request(
        &app,
        Method::PATCH,
        &format!("/api/reminders/{first_id}"),
        Some(json!({ "completed": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["completed"], json!(true));

    let (_, pending) = request(&app, Method::GET, "/api/reminders", None).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);
    assert_eq!(pending[0]["text"], "water plants");

    let (_, all) = request(
        &app,
        Method::GET,
        "/api/reminders?include_completed=true",
        None,
    )
    .await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn mood_score_bounds_are_enforced() {
    let (app, _tmp) = test_app();

    let (status, _) = request(&app, Method::POST, "/api/mood", Some(json!({ "score": 6 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, sample) = request(
        &app,
        Method::POST,
        "/api/mood",
        Some(json!({ "score": 4, "note": "steady" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sample["score"], json!(4));

    let (_, listed) = request(&app, Method::GET, "/api/mood", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn focus_sessions_and_daily_totals() {
    let (app, _tmp) = test_app();

    let (status, session) = request(
        &app,
        Method::POST,
        "/api/focus/sessions",
        Some(json!({
            "kind": "pomodoro",
            "started_at": "2026-08-29T08:00:00Z",
            "planned_minutes": 25,
            "actual_minutes": 25,
            "completed": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(session["kind"], "pomodoro");

    let (status, _) = request(
        &app,
        Method::POST,
        "/api/focus/sessions",
        Some(json!({
            "kind": "deep_work",
            "started_at": "2026-08-29T10:00:00Z",
            "planned_minutes": 0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, totals) = request(&app, Method::GET, "/api/focus/daily?days=365", None).await;
    assert_eq!(status, StatusCode::OK);
    let days = totals.as_array().unwrap();
    assert!(days
        .iter()
        .any(|day| day["date"] == "2026-08-29" && day["focus_minutes"] == json!(25)));
}

#[tokio::test]
async fn snippets_crud_over_http() {
    let (app, _tmp) = test_app();

    let (status, snippet) = request(
        &app,
        Method::POST,
        "/api/snippets",
        Some(json!({ "title": "wal pragma", "code": "PRAGMA journal_mode=WAL;" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(snippet["language"], "text");
    let id = snippet["id"].as_i64().unwrap();

    let (status, updated) = request(
        &app,
        Method::PATCH,
        &format!("/api/snippets/{id}"),
        Some(json!({ "language": "sql" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["language"], "sql");
}

#[tokio::test]
async fn dashboard_news_without_key_is_precondition_failed() {
    let (app, _tmp) = test_app();
    let (status, body) = request(&app, Method::GET, "/api/dashboard/news", None).await;

    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(body["code"], "NOT_CONFIGURED");
}

#[tokio::test]
async fn dashboard_weather_upstream_failure_is_bad_gateway() {
    // Config points the weather base URL at a closed port.
    let (app, _tmp) = test_app();
    let (status, body) = request(&app, Method::GET, "/api/dashboard/weather", None).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "UPSTREAM_FAILED");
}
