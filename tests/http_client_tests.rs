// Integration tests for the reqwest-backed capability client
//
// Each test serves a small axum app on an ephemeral local port and drives the
// real HTTP client against it, so these run on the real clock.

use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use interview_coach::capability::{Headers, Payload};
use interview_coach::config::{AnalysisConfig, TranscriptionConfig};
use interview_coach::{
    AnalysisAdapter, AnalysisError, CapabilityClient, Clip, FailureKind, FailureReason,
    HttpCapabilityClient, TranscriptionAdapter,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client() -> HttpCapabilityClient {
    HttpCapabilityClient::new(CONNECT_TIMEOUT).unwrap()
}

fn no_headers() -> Headers {
    Vec::new()
}

// ============================================================================
// Transport behaviour
// ============================================================================

async fn echo(headers: HeaderMap, body: Bytes) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };

    Json(json!({
        "content_type": header("content-type"),
        "authorization": header("authorization"),
        "body": String::from_utf8_lossy(&body),
    }))
}

async fn transcript_status(Path(id): Path<String>, headers: HeaderMap) -> Json<Value> {
    Json(json!({
        "id": id,
        "status": "completed",
        "authorized": headers.contains_key("authorization"),
    }))
}

fn transport_app() -> Router {
    Router::new()
        .route("/echo", post(echo))
        .route("/plain", post(|| async { "accepted" }))
        .route(
            "/denied",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
        )
        .route("/transcript/:id", get(transcript_status))
        .route(
            "/missing/:id",
            get(|| async { (StatusCode::NOT_FOUND, "no such job") }),
        )
}

#[tokio::test]
async fn test_json_submit_sends_body_and_headers() {
    let base = serve(transport_app()).await;
    let headers = vec![("authorization".to_string(), "secret".to_string())];

    let body = client()
        .submit(
            &format!("{}/echo", base),
            Payload::Json(json!({"audio_url": "https://cdn.test/a"})),
            &headers,
        )
        .await
        .unwrap();

    assert_eq!(body["content_type"], "application/json");
    assert_eq!(body["authorization"], "secret");
    let sent: Value = serde_json::from_str(body["body"].as_str().unwrap()).unwrap();
    assert_eq!(sent["audio_url"], "https://cdn.test/a");
}

#[tokio::test]
async fn test_bytes_submit_is_octet_stream() {
    let base = serve(transport_app()).await;

    let body = client()
        .submit(
            &format!("{}/echo", base),
            Payload::Bytes(Bytes::from_static(b"raw clip")),
            &no_headers(),
        )
        .await
        .unwrap();

    assert_eq!(body["content_type"], "application/octet-stream");
    assert_eq!(body["body"], "raw clip");
}

#[tokio::test]
async fn test_non_json_body_is_passed_through_as_string() {
    let base = serve(transport_app()).await;

    let body = client()
        .submit(&format!("{}/plain", base), Payload::Json(json!({})), &no_headers())
        .await
        .unwrap();

    assert_eq!(body, Value::String("accepted".to_string()));
}

#[tokio::test]
async fn test_error_status_carries_code_and_body() {
    let base = serve(transport_app()).await;

    let err = client()
        .submit(&format!("{}/denied", base), Payload::Json(json!({})), &no_headers())
        .await
        .unwrap_err();

    assert_eq!(err.status_code, Some(401));
    assert_eq!(err.message, "invalid api key");
}

#[tokio::test]
async fn test_refused_connection_has_no_status_code() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let err = client()
        .submit(&format!("http://{}/echo", addr), Payload::Json(json!({})), &no_headers())
        .await
        .unwrap_err();

    assert_eq!(err.status_code, None);
    assert!(err.message.contains("/echo"), "{}", err.message);
}

#[tokio::test]
async fn test_fetch_status_appends_job_id() {
    let base = serve(transport_app()).await;
    let headers = vec![("authorization".to_string(), "secret".to_string())];

    // Trailing slash on the endpoint must not double up
    let response = client()
        .fetch_status(&format!("{}/transcript/", base), "tx-42", &headers)
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body["id"], "tx-42");
    assert_eq!(response.body["authorized"], true);
}

#[tokio::test]
async fn test_fetch_status_error_status() {
    let base = serve(transport_app()).await;

    let err = client()
        .fetch_status(&format!("{}/missing", base), "tx-42", &no_headers())
        .await
        .unwrap_err();

    assert_eq!(err.status_code, Some(404));
}

// ============================================================================
// Path budgets over the shared client
// ============================================================================

fn model_reply() -> Value {
    let analysis = json!({
        "technical_response": {"accuracy": "Accurate", "depth": "Deep"},
        "soft_skills": {
            "communication_skills": "Clear",
            "clarity_of_explanation": "Good",
            "presentation": "Calm"
        },
        "body_language": {
            "posture": "Upright",
            "gestures": "Few",
            "facial_expressions": "Warm"
        },
        "feedback": {"suggestion": "Add numbers."}
    });
    json!({"candidates": [{"content": {"parts": [{"text": analysis.to_string()}]}}]})
}

/// Model that takes longer to answer than the client's connect timeout
fn slow_model_app(delay: Duration) -> Router {
    Router::new().fallback(move || async move {
        tokio::time::sleep(delay).await;
        Json(model_reply()).into_response()
    })
}

fn analysis_config(base: &str, timeout_ms: u64) -> AnalysisConfig {
    AnalysisConfig {
        base_url: base.to_string(),
        api_key: "g-key".to_string(),
        model: "test-model".to_string(),
        timeout_ms,
        question: "Tell me about yourself.".to_string(),
    }
}

fn video() -> Clip {
    Clip::new(vec![1u8, 2, 3, 4], "video/webm")
}

#[tokio::test]
async fn test_slow_reply_within_analysis_budget_succeeds() {
    let base = serve(slow_model_app(Duration::from_millis(1500))).await;
    let adapter = AnalysisAdapter::new(Arc::new(client()), &analysis_config(&base, 4000));

    let result = adapter.analyze(&video()).await.unwrap();

    assert_eq!(result.feedback.suggestion, "Add numbers.");
}

#[tokio::test]
async fn test_analysis_budget_bounds_slow_reply() {
    let base = serve(slow_model_app(Duration::from_secs(5))).await;
    let adapter = AnalysisAdapter::new(Arc::new(client()), &analysis_config(&base, 300));

    let err = adapter.analyze(&video()).await.unwrap_err();

    assert!(matches!(err, AnalysisError::Timeout(_)), "{:?}", err);
    assert_eq!(FailureReason::from(err).kind, FailureKind::Timeout);
}

#[tokio::test]
async fn test_transcription_over_http() {
    let app = Router::new()
        .route(
            "/v2/upload",
            post(|body: Bytes| async move {
                Json(json!({"upload_url": format!("https://cdn.test/{}", body.len())}))
            }),
        )
        .route(
            "/v2/transcript",
            post(|Json(request): Json<Value>| async move {
                assert_eq!(request["sentiment_analysis"], true);
                Json(json!({"id": "tx-7", "status": "queued"}))
            }),
        )
        .route(
            "/v2/transcript/:id",
            get(|Path(id): Path<String>| async move {
                Json(json!({
                    "id": id,
                    "status": "completed",
                    "text": "I ship things.",
                    "sentiment_analysis_results": [
                        {"text": "I ship things.", "sentiment": "NEUTRAL", "confidence": 0.8}
                    ]
                }))
            }),
        );
    let base = serve(app).await;
    let config = TranscriptionConfig {
        base_url: format!("{}/v2", base),
        api_key: "t-key".to_string(),
        poll_interval_ms: 50,
        timeout_ms: 5000,
    };
    let adapter = TranscriptionAdapter::new(Arc::new(client()), &config);

    let result = adapter.transcribe(&video()).await.unwrap();

    assert_eq!(result.text, "I ship things.");
    assert_eq!(result.sentiment_segments.len(), 1);
}
