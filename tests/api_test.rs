// tests/api_test.rs — Integration test: HTTP routes via tower oneshot

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use lucidra::api::{build_router, ApiState};
use lucidra::core::ScenarioAnalysisService;
use lucidra::infra::config::ProvidersConfig;
use lucidra::infra::errors::ProviderError;
use lucidra::provider::retry::BackoffPolicy;
use lucidra::provider::{HttpTransport, OrchestrationClient, ProviderRegistry, ProviderRequest};
use lucidra::usage::UsageLedger;

/// Answers every call as the primary analysis service would, optionally
/// after a delay.
struct PrimaryStub {
    delay: Duration,
}

#[async_trait]
impl HttpTransport for PrimaryStub {
    async fn post_json(
        &self,
        _endpoint: &str,
        request: &ProviderRequest,
        _timeout: Duration,
    ) -> Result<Value, ProviderError> {
        tokio::time::sleep(self.delay).await;
        let scenario = request.body["scenario"].as_str().unwrap_or_default();
        Ok(json!({ "ai_analysis": format!("AI view on: {scenario}") }))
    }
}

fn app_with(delay: Duration, deadline: Duration) -> Router {
    let registry = Arc::new(ProviderRegistry::from_config(&ProvidersConfig::default()).unwrap());
    let client = OrchestrationClient::new(registry, Arc::new(PrimaryStub { delay }))
        .with_backoff(BackoffPolicy::none());
    let service = ScenarioAnalysisService::new(Arc::new(UsageLedger::default()), client);
    build_router(ApiState {
        service: Arc::new(service),
        deadline,
    })
}

fn app() -> Router {
    app_with(Duration::ZERO, Duration::from_secs(5))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    session: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Option<String>, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(id) = session {
        req = req.header("x-session-id", id);
    }
    let req = match body {
        Some(b) => req
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let session_id = resp
        .headers()
        .get("x-session-id")
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, session_id, json)
}

#[tokio::test]
async fn test_health() {
    let (status, _, body) = send(&app(), "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "lucidra");
}

#[tokio::test]
async fn test_suggest_new_session_uses_fallback() {
    let (status, session, body) = send(
        &app(),
        "POST",
        "/api/scenario/suggest",
        None,
        Some(json!({ "scenario": "We are losing market share to a new competitor" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(session.unwrap().starts_with("session_"));
    assert_eq!(body["used_ai"], false);
    assert_eq!(body["provider"], "fallback");
    assert_eq!(body["ai_status"], "not opted in");
    assert_eq!(body["coaching"]["primary_category"], "market");
    assert_eq!(body["coaching"]["is_fallback"], true);
}

#[tokio::test]
async fn test_suggest_rejects_blank_scenario() {
    let (status, _, body) = send(
        &app(),
        "POST",
        "/api/scenario/suggest",
        None,
        Some(json!({ "scenario": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Scenario is required");
}

#[tokio::test]
async fn test_opt_in_then_suggest_uses_ai() {
    let app = app();
    let (_, session, body) = send(&app, "POST", "/api/scenario/opt-in", None, None).await;
    let session = session.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["usage"]["ai_enabled"], true);

    let (status, echoed, body) = send(
        &app,
        "POST",
        "/api/scenario/suggest",
        Some(&session),
        Some(json!({ "scenario": "Hiring plan" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(echoed.as_deref(), Some(session.as_str()));
    assert_eq!(body["used_ai"], true);
    assert_eq!(body["provider"], "primary");
    assert_eq!(body["ai_analysis"], "AI view on: Hiring plan");
    assert_eq!(body["usage"]["calls_used"], 1);
    assert!(body.get("coaching").is_none());
}

#[tokio::test]
async fn test_unknown_session_header_gets_new_id() {
    let (_, session, _) = send(
        &app(),
        "GET",
        "/api/scenario/usage",
        Some("made-up-id"),
        None,
    )
    .await;
    let session = session.unwrap();
    assert_ne!(session, "made-up-id");
    assert!(session.starts_with("session_"));
}

#[tokio::test]
async fn test_usage_reports_upgrade_when_gated() {
    let app = app();
    let (_, session, body) = send(&app, "GET", "/api/scenario/usage", None, None).await;
    assert_eq!(body["can_use_ai"], false);
    assert_eq!(body["ai_status"], "not opted in");
    assert!(body["upgrade_message"].as_str().unwrap().contains("Basic"));
    assert_eq!(body["usage"]["tokens_limit"], 1000);
    assert_eq!(body["usage"]["calls_limit"], 5);

    let session = session.unwrap();
    send(&app, "POST", "/api/scenario/opt-in", Some(&session), None).await;
    let (_, _, body) = send(&app, "GET", "/api/scenario/usage", Some(&session), None).await;
    assert_eq!(body["can_use_ai"], true);
    assert_eq!(body["ai_status"], "Available");
    assert!(body.get("upgrade_message").is_none());
}

#[tokio::test]
async fn test_opt_out_disables_ai() {
    let app = app();
    let (_, session, _) = send(&app, "POST", "/api/scenario/opt-in", None, None).await;
    let session = session.unwrap();
    let (_, _, body) = send(&app, "POST", "/api/scenario/opt-out", Some(&session), None).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["usage"]["ai_enabled"], false);
}

#[tokio::test]
async fn test_coaching_tips() {
    let (status, _, body) = send(&app(), "GET", "/api/scenario/coaching-tips", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tips"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn test_deadline_returns_fallback_without_charge() {
    let app = app_with(Duration::from_secs(10), Duration::from_millis(50));
    let (_, session, _) = send(&app, "POST", "/api/scenario/opt-in", None, None).await;

    let (status, _, body) = send(
        &app,
        "POST",
        "/api/scenario/suggest",
        session.as_deref(),
        Some(json!({ "scenario": "Cash flow crunch" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["used_ai"], false);
    assert_eq!(body["ai_status"], "AI request deadline exceeded");
    assert_eq!(body["usage"]["calls_used"], 0);
    assert_eq!(body["coaching"]["primary_category"], "financial");
}
