use super::*;
use crate::{ClientError, ReviewWorkflow};
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use shared::{
    domain::Sentiment,
    protocol::{AnalyzeReviewRequest, ANALYZE_REVIEW_PATH, REVIEWS_PATH},
};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct BackendState {
    rows: Arc<Mutex<Vec<Value>>>,
}

async fn handle_analyze(
    State(state): State<BackendState>,
    Json(payload): Json<AnalyzeReviewRequest>,
) -> (StatusCode, Json<Value>) {
    let text = payload.review_text.trim().to_string();
    if text.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Review text is required" })),
        );
    }

    let lower = text.to_ascii_lowercase();
    let sentiment = if lower.contains("great") {
        "positive"
    } else if lower.contains("broke") {
        "negative"
    } else {
        "neutral"
    };
    let key_points: Vec<&str> = ["fast shipping", "battery life"]
        .into_iter()
        .filter(|point| lower.contains(point))
        .collect();

    let mut rows = state.rows.lock().await;
    let id = rows.len() + 1;
    let created_at = format!("2024-05-{id:02}T09:30:00");
    // Stored the way the backend persists it: key points as an encoded string or null.
    let stored_points = if key_points.is_empty() {
        Value::Null
    } else {
        Value::String(json!(key_points).to_string())
    };
    rows.push(json!({
        "id": id,
        "review_text": text,
        "sentiment": sentiment,
        "key_points": stored_points,
        "created_at": created_at,
    }));

    (
        StatusCode::OK,
        Json(json!({
            "id": id,
            "review_text": text,
            "sentiment": sentiment,
            "key_points": key_points,
            "created_at": created_at,
        })),
    )
}

async fn handle_list(State(state): State<BackendState>) -> Json<Value> {
    let rows = state.rows.lock().await;
    let newest_first: Vec<Value> = rows.iter().rev().cloned().collect();
    Json(json!({ "reviews": newest_first }))
}

async fn handle_broken() -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded".to_string())
}

async fn spawn_backend() -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/api/analyze-review", post(handle_analyze))
        .route("/api/reviews", get(handle_list))
        .route("/api/broken", get(handle_broken))
        .with_state(BackendState::default());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}/api"))
}

#[test]
fn base_url_trailing_slash_is_normalized() {
    let transport = HttpTransport::new("http://localhost:6543/api/");
    assert_eq!(transport.base_url(), "http://localhost:6543/api");
    assert_eq!(
        transport.endpoint("/reviews"),
        "http://localhost:6543/api/reviews"
    );
    assert_eq!(
        transport.endpoint(ANALYZE_REVIEW_PATH),
        "http://localhost:6543/api/analyze-review"
    );
}

#[test]
fn response_helpers_interpret_status_and_error_body() {
    let failed = TransportResponse::new(400, r#"{"error": "Review text is required"}"#);
    assert!(!failed.is_success());
    assert_eq!(
        failed.error_message().as_deref(),
        Some("Review text is required")
    );

    let ok = TransportResponse::new(204, "");
    assert!(ok.is_success());
    assert_eq!(ok.error_message(), None);
}

#[tokio::test]
async fn http_transport_returns_status_and_raw_body() {
    let base_url = spawn_backend().await.expect("spawn backend");
    let transport = HttpTransport::new(base_url);

    let response = transport.get_json("broken").await.expect("response");
    assert_eq!(response.status, 500);
    assert_eq!(response.body, "upstream exploded");
    assert_eq!(response.error_message(), None);

    let response = transport
        .post_json(ANALYZE_REVIEW_PATH, json!({ "review_text": "   " }))
        .await
        .expect("response");
    assert_eq!(response.status, 400);
    assert_eq!(
        response.error_message().as_deref(),
        Some("Review text is required")
    );
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let transport = HttpTransport::new(format!("http://{addr}/api"));
    let err = transport
        .get_json(REVIEWS_PATH)
        .await
        .expect_err("must fail");
    assert!(!err.message.is_empty());

    let workflow = ReviewWorkflow::new(Arc::new(transport));
    let err = workflow
        .submit_review("Great product")
        .await
        .expect_err("must fail");
    assert!(matches!(err, ClientError::Transport(_)), "unexpected: {err:?}");
    assert!(!workflow.snapshot().is_submitting);
}

#[tokio::test]
async fn workflow_round_trip_against_backend() {
    let base_url = spawn_backend().await.expect("spawn backend");
    let workflow = ReviewWorkflow::new(Arc::new(HttpTransport::new(base_url)));

    assert!(workflow.load().await.expect("initial load").is_empty());

    workflow.set_draft("Great product, fast shipping!");
    let result = workflow.submit_draft().await.expect("submit");
    assert_eq!(result.sentiment_kind(), Sentiment::Positive);
    assert_eq!(result.key_points, vec!["fast shipping"]);

    workflow
        .submit_review("Broke after a week")
        .await
        .expect("second submit");

    let state = workflow.snapshot();
    assert_eq!(state.draft_text, "");
    assert_eq!(state.history.len(), 2);
    assert_eq!(state.history[0].review_text, "Broke after a week");
    assert_eq!(state.history[0].sentiment_kind(), Sentiment::Negative);
    assert!(state.history[0].key_points.is_empty());
    assert_eq!(state.history[1].key_points, vec!["fast shipping"]);
    assert!(state.history[1].created_date().is_some());

    let refreshed = workflow.refresh_history().await.expect("refresh");
    assert_eq!(refreshed, state.history);
}
