// mentor-service-rs/src/tests.rs
// Tests for the analyze pipeline: prompt construction, boundary validation
// and endpoint behavior against a stubbed completion provider.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::llm_client::LLMClient;
use crate::prompt::{build_feedback_prompt, DEFAULT_PATTERN, DEFAULT_PROBLEM_NAME};
use crate::validation::{parse_analysis_request, ApiValidationError};
use crate::{app, AppState};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

fn test_state(mock_server: &MockServer) -> Arc<AppState> {
    Arc::new(AppState {
        llm: LLMClient::with_config(
            format!("{}{}", mock_server.uri(), COMPLETIONS_PATH),
            "test-api-key".to_string(),
            "gpt-4.1-mini".to_string(),
            Duration::from_secs(5),
        ),
    })
}

fn unconfigured_state(mock_server: &MockServer) -> Arc<AppState> {
    Arc::new(AppState {
        llm: LLMClient::with_config(
            format!("{}{}", mock_server.uri(), COMPLETIONS_PATH),
            String::new(),
            "gpt-4.1-mini".to_string(),
            Duration::from_secs(5),
        ),
    })
}

/// Provider response with a single choice carrying the given content value.
fn completion_response(content: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-mock123",
        "object": "chat.completion",
        "model": "gpt-4.1-mini",
        "usage": { "prompt_tokens": 50, "completion_tokens": 20, "total_tokens": 70 },
        "choices": [
            {
                "index": 0,
                "finish_reason": "stop",
                "message": { "role": "assistant", "content": content }
            }
        ]
    }))
}

async fn post_analyze(state: Arc<AppState>, body: &str) -> (StatusCode, Value) {
    let response = app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/analyze")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[test]
fn test_prompt_contains_submission_verbatim() {
    let code = "def solve(nums):\n    return {n: i for i, n in enumerate(nums)}";
    let prompt = build_feedback_prompt(Some("Two Sum"), Some("arrays-hashing"), code);

    assert!(prompt.contains(code));
    assert!(prompt.contains("Problem: Two Sum"));
    assert!(prompt.contains("Pattern: arrays-hashing"));
    assert!(prompt.contains("Identify the most likely algorithmic pattern"));
    assert!(prompt.contains("Be concise but specific."));
}

#[test]
fn test_prompt_uses_defaults_when_metadata_absent() {
    let prompt = build_feedback_prompt(None, None, "x = 1");
    assert!(prompt.contains(&format!("Problem: {}", DEFAULT_PROBLEM_NAME)));
    assert!(prompt.contains(&format!("Pattern: {}", DEFAULT_PATTERN)));

    // Empty metadata behaves like absent metadata
    let prompt = build_feedback_prompt(Some(""), Some(""), "x = 1");
    assert!(prompt.contains("Problem: Unknown problem"));
    assert!(prompt.contains("Pattern: unknown"));
}

#[test]
fn test_validation_rejects_unusable_code() {
    let bodies: &[&[u8]] = &[
        b"{}",
        br#"{"code": null}"#,
        br#"{"code": 42}"#,
        br#"{"code": ""}"#,
        br#"{"problemName": "Test", "pattern": "dp"}"#,
        b"not json at all",
        b"[1, 2, 3]",
    ];

    for body in bodies {
        assert_eq!(
            parse_analysis_request(body),
            Err(ApiValidationError::MissingCode),
            "body {:?} should be rejected",
            String::from_utf8_lossy(body)
        );
    }
}

#[test]
fn test_validation_accepts_submission() {
    let request = parse_analysis_request(
        br#"{"problemName": "Two Sum", "code": "x = 1", "pattern": "dp"}"#,
    )
    .unwrap();
    assert_eq!(request.problem_name.as_deref(), Some("Two Sum"));
    assert_eq!(request.code, "x = 1");
    assert_eq!(request.pattern.as_deref(), Some("dp"));

    // Non-string metadata falls back to the prompt defaults instead of failing
    let request =
        parse_analysis_request(br#"{"problemName": 7, "code": "x = 1", "pattern": null}"#).unwrap();
    assert!(request.problem_name.is_none());
    assert!(request.pattern.is_none());
}

#[tokio::test]
async fn test_analyze_returns_trimmed_feedback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(completion_response(json!("  Looks good.  ")))
        .mount(&mock_server)
        .await;

    let (status, body) = post_analyze(test_state(&mock_server), r#"{"code": "x = 1"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "feedback": "Looks good." }));
}

#[tokio::test]
async fn test_analyze_prompt_reaches_provider() {
    let mock_server = MockServer::start().await;

    // The outbound completion request must carry the submission verbatim,
    // along with the mentor system instruction.
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(body_string_contains("def f(): pass"))
        .and(body_string_contains("Problem: Test"))
        .and(body_string_contains("Pattern: dp"))
        .and(body_string_contains(
            "You are a strict but helpful coding interview mentor.",
        ))
        .respond_with(completion_response(json!("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, body) = post_analyze(
        test_state(&mock_server),
        r#"{"problemName": "Test", "code": "def f(): pass", "pattern": "dp"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "feedback": "ok" }));
}

#[tokio::test]
async fn test_analyze_defaults_reach_provider() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(body_string_contains("Problem: Unknown problem"))
        .and(body_string_contains("Pattern: unknown"))
        .respond_with(completion_response(json!("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, _) = post_analyze(test_state(&mock_server), r#"{"code": "x = 1"}"#).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_analyze_fallback_when_no_choices() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&mock_server)
        .await;

    let (status, body) = post_analyze(test_state(&mock_server), r#"{"code": "x = 1"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "feedback": "No feedback generated." }));
}

#[tokio::test]
async fn test_analyze_fallback_when_content_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(completion_response(json!(null)))
        .mount(&mock_server)
        .await;

    let (status, body) = post_analyze(test_state(&mock_server), r#"{"code": "x = 1"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "feedback": "No feedback generated." }));
}

#[tokio::test]
async fn test_analyze_upstream_failure_is_generic() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("provider exploded"))
        .mount(&mock_server)
        .await;

    let (status, body) = post_analyze(test_state(&mock_server), r#"{"code": "x = 1"}"#).await;

    // The provider detail stays in the log; the wire carries the generic error
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Server error" }));
}

#[tokio::test]
async fn test_analyze_malformed_provider_payload_is_generic() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let (status, body) = post_analyze(test_state(&mock_server), r#"{"code": "x = 1"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Server error" }));
}

#[tokio::test]
async fn test_analyze_rejects_missing_code_without_upstream_call() {
    let mock_server = MockServer::start().await;

    // The provider must never be invoked for an invalid submission
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(completion_response(json!("should not happen")))
        .expect(0)
        .mount(&mock_server)
        .await;

    for body in [r#"{"pattern": "dp"}"#, r#"{"code": 42}"#, r#"{"code": null}"#] {
        let (status, payload) = post_analyze(test_state(&mock_server), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload, json!({ "error": "Code is required" }));
    }
}

#[tokio::test]
async fn test_analyze_fails_closed_without_credential() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(completion_response(json!("should not happen")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (status, body) =
        post_analyze(unconfigured_state(&mock_server), r#"{"code": "x = 1"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Server error" }));
}

#[tokio::test]
async fn test_health_reports_credential_status() {
    let mock_server = MockServer::start().await;

    let response = app(test_state(&mock_server))
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["healthy"], true);
    assert_eq!(body["service_name"], "mentor-service");
    assert_eq!(body["status"], "SERVING");

    let response = app(unconfigured_state(&mock_server))
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["healthy"], false);
    assert_eq!(body["status"], "DEGRADED");
}
