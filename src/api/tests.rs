//! Router-level tests that exercise the full request path

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::api::create_router;
use crate::config::Config;
use crate::services::NoopKeepAwake;
use crate::state::AppState;

fn test_config(minutes: u64, seconds: u64) -> Config {
    Config {
        port: 0,
        host: "127.0.0.1".to_string(),
        minutes,
        seconds,
        tick_ms: 100,
        keep_awake_command: None,
        alert_command: None,
        verbose: false,
    }
}

fn test_router_with(config: Config) -> Router {
    let state = Arc::new(AppState::new(&config, Arc::new(NoopKeepAwake)));
    create_router(state)
}

fn test_router(minutes: u64, seconds: u64) -> Router {
    test_router_with(test_config(minutes, seconds))
}

async fn send(router: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn send_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let router = test_router(0, 0);

    let (status, body) = send(&router, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], "0.2.0");
}

#[tokio::test]
async fn status_reports_the_initial_duration() {
    let router = test_router(1, 30);

    let (status, body) = send(&router, "GET", "/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["phase"], "idle");
    assert_eq!(body["timer"]["total_seconds"], 90);
    assert_eq!(body["timer"]["remaining_seconds"], 90);
    assert_eq!(body["display"], "01:30");
    assert_eq!(body["configured_minutes"], 1);
    assert_eq!(body["configured_seconds"], 30);
}

#[tokio::test]
async fn start_then_pause_keeps_the_remaining_time() {
    let router = test_router(1, 30);

    let (status, body) = send(&router, "POST", "/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["message"], "Countdown started");

    let (status, body) = send(&router, "POST", "/pause").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paused");
    assert_eq!(body["message"], "Countdown paused");
    assert_eq!(body["timer"]["remaining_seconds"], 90);
}

#[tokio::test]
async fn duplicate_start_is_acknowledged_without_restarting() {
    let router = test_router(1, 0);

    send(&router, "POST", "/start").await;
    let (status, body) = send(&router, "POST", "/start").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["message"], "Countdown already running");
}

#[tokio::test]
async fn start_without_a_duration_is_acknowledged() {
    let router = test_router(0, 0);

    let (status, body) = send(&router, "POST", "/start").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");
    assert_eq!(
        body["message"],
        "Nothing to count down, no duration configured"
    );
}

#[tokio::test]
async fn duration_endpoint_combines_minutes_and_seconds() {
    let router = test_router(0, 0);

    let (status, body) = send_json(
        &router,
        "/duration",
        json!({ "minutes": 2, "seconds": 30 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Duration set to 02:30");
    assert_eq!(body["timer"]["total_seconds"], 150);
}

#[tokio::test]
async fn duration_endpoint_clamps_negative_values() {
    let router = test_router(1, 0);

    let (status, body) = send_json(
        &router,
        "/duration",
        json!({ "minutes": -5, "seconds": -5 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Duration set to 00:00");
    assert_eq!(body["timer"]["total_seconds"], 0);
}

#[tokio::test]
async fn duration_endpoint_defaults_missing_fields_to_zero() {
    let router = test_router(0, 0);

    let (status, body) = send_json(&router, "/duration", json!({ "minutes": 2 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["total_seconds"], 120);

    let (status, body) = send_json(&router, "/duration", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["total_seconds"], 0);
}

#[tokio::test]
async fn duration_change_is_ignored_while_running() {
    let router = test_router(1, 30);

    send(&router, "POST", "/start").await;
    let (status, body) = send_json(
        &router,
        "/duration",
        json!({ "minutes": 5, "seconds": 0 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Duration change ignored while the countdown is running"
    );
    assert_eq!(body["timer"]["total_seconds"], 90);
}

#[tokio::test]
async fn preset_endpoint_sets_whole_minutes() {
    let router = test_router(0, 0);

    let (status, body) = send(&router, "POST", "/preset/25").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Preset applied, duration set to 25:00");
    assert_eq!(body["timer"]["total_seconds"], 1500);
}

#[tokio::test]
async fn toggle_endpoint_starts_then_pauses() {
    let router = test_router(0, 45);

    let (status, body) = send(&router, "POST", "/toggle").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Countdown started");
    assert_eq!(body["status"], "running");

    let (status, body) = send(&router, "POST", "/toggle").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Countdown paused");
    assert_eq!(body["timer"]["remaining_seconds"], 45);
}

#[tokio::test]
async fn stop_endpoint_rewinds_to_the_full_duration() {
    let router = test_router(1, 0);

    send(&router, "POST", "/start").await;
    let (status, body) = send(&router, "POST", "/stop").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");
    assert_eq!(body["message"], "Countdown stopped");
    assert_eq!(body["timer"]["remaining_seconds"], 60);
}

#[tokio::test]
async fn reset_endpoint_reapplies_the_configured_duration() {
    let router = test_router(2, 0);

    send(&router, "POST", "/start").await;
    let (status, body) = send(&router, "POST", "/reset").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Countdown reset");
    assert_eq!(body["timer"]["phase"], "idle");
    assert_eq!(body["timer"]["total_seconds"], 120);
    assert_eq!(body["timer"]["remaining_seconds"], 120);
}

#[tokio::test]
async fn resync_is_acknowledged_when_nothing_is_running() {
    let router = test_router(1, 0);

    let (status, body) = send(&router, "POST", "/resync").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");
    assert_eq!(body["message"], "Resync ignored, countdown not running");
}

#[tokio::test]
async fn alert_test_without_a_command_is_acknowledged() {
    let router = test_router(0, 0);

    let (status, body) = send(&router, "POST", "/alert/test").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "No alert command configured");
}

#[tokio::test]
async fn alert_test_runs_the_configured_command() {
    let mut config = test_config(0, 0);
    config.alert_command = Some("true".to_string());
    let router = test_router_with(config);

    let (status, body) = send(&router, "POST", "/alert/test").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Alert test triggered");
}

#[tokio::test]
async fn alert_test_reports_a_failing_command() {
    let mut config = test_config(0, 0);
    config.alert_command = Some("false".to_string());
    let router = test_router_with(config);

    let (status, body) = send(&router, "POST", "/alert/test").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Alert test failed"));
}

#[tokio::test]
async fn unknown_routes_return_not_found() {
    let router = test_router(0, 0);

    let (status, _) = send(&router, "GET", "/missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
