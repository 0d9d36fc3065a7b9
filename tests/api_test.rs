//! HTTP API tests driven through the router without a socket

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use common::*;
use serde_json::json;
use serde_json::Value;
use sqlfeedback::api::build_app;
use tower::ServiceExt;

const QUERY: &str = "SELCT Name FROM Employees;";

fn app(reply: &str) -> Router {
    let embedder =
        Arc::new(TableEmbedder::new(vec![0.0, 0.0, 0.0]).with(QUERY, vec![0.98, 0.02, 0.0]));
    let llm = Arc::new(ScriptedCompletion::new(reply));
    build_app(Arc::new(pipeline(embedder, llm)), false)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn profile_json() -> Value {
    json!({
        "typing_speed": 4.0,
        "avg_flight_time": 150.0,
        "avg_dwell_time": 80.0,
        "backspace_rate": 0.01,
        "delete_rate": 0.0,
        "retry_count": 0,
        "emotion": "happy"
    })
}

#[tokio::test]
async fn test_health_reports_index_size() {
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app("{}"), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["examples"], 5);
    assert_eq!(body["data"]["dimension"], 3);
}

#[tokio::test]
async fn test_feedback_returns_parsed_verdict() {
    let reply = r#"{"error_type":"Syntax Error","error_subtype":"misspelling","personalized_feedback":"Check SELECT."}"#;
    let request = post(
        "/api/feedback",
        &json!({ "query": QUERY, "profile": profile_json(), "include_details": true }),
    );
    let (status, body) = send(app(reply), request).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["error_type"], "Syntax Error");
    assert_eq!(data["error_subtype"], "misspelling");
    assert_eq!(data["personalized_feedback"], "Check SELECT.");
    assert_eq!(data["examples"].as_array().unwrap().len(), 2);
    assert!(data["prompt"].as_str().unwrap().contains(QUERY));
}

#[tokio::test]
async fn test_feedback_omits_details_by_default() {
    let reply = r#"{"error_type":"Syntax Error","error_subtype":"misspelling","personalized_feedback":"Check SELECT."}"#;
    let request = post(
        "/api/feedback",
        &json!({ "query": QUERY, "profile": profile_json() }),
    );
    let (status, body) = send(app(reply), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].get("examples").is_none());
    assert!(body["data"].get("prompt").is_none());
}

#[tokio::test]
async fn test_prose_reply_is_bad_gateway_with_raw_text() {
    let prose = "Looks like a typo in SELECT.";
    let request = post(
        "/api/feedback",
        &json!({ "query": QUERY, "profile": profile_json() }),
    );
    let (status, body) = send(app(prose), request).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error_kind"], "NoJsonFoundError");
    assert_eq!(body["raw_output"], prose);
}

#[tokio::test]
async fn test_oversized_k_is_bad_request() {
    let request = post(
        "/api/feedback",
        &json!({ "query": QUERY, "profile": profile_json(), "k": 10 }),
    );
    let (status, body) = send(app("{}"), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_kind"], "KExceedsStoreSizeError");
    assert!(body.get("raw_output").is_none());
}

#[tokio::test]
async fn test_invalid_profile_is_bad_request() {
    let mut profile = profile_json();
    profile["typing_speed"] = json!(-1.0);
    let request = post(
        "/api/feedback",
        &json!({ "query": QUERY, "profile": profile }),
    );
    let (status, body) = send(app("{}"), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_kind"], "InvalidProfileError");
}

#[tokio::test]
async fn test_search_returns_closest_first() {
    let request = post("/api/search", &json!({ "query": QUERY, "k": 3 }));
    let (status, body) = send(app("{}"), request).await;

    assert_eq!(status, StatusCode::OK);
    let hits = body["data"].as_array().unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0]["query"], "SELCT Name FROM Workers;");
    assert_eq!(hits[0]["error_subtype"], "misspelling");

    let distances: Vec<f64> = hits
        .iter()
        .map(|hit| hit["distance"].as_f64().unwrap())
        .collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_negative_retry_count_is_invalid_profile() {
    let mut profile = profile_json();
    profile["retry_count"] = json!(-1);
    let request = post(
        "/api/feedback",
        &json!({ "query": QUERY, "profile": profile }),
    );
    let (status, body) = send(app("{}"), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error_kind"], "InvalidProfileError");
}

#[tokio::test]
async fn test_unknown_emotion_is_invalid_profile() {
    let mut profile = profile_json();
    profile["emotion"] = json!("bored");
    let request = post(
        "/api/feedback",
        &json!({ "query": QUERY, "profile": profile }),
    );
    let (status, body) = send(app("{}"), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_kind"], "InvalidProfileError");
    assert!(body["error"].as_str().unwrap().contains("bored"));
}

#[tokio::test]
async fn test_emotion_is_case_insensitive() {
    let reply = r#"{"error_type":"Syntax Error","error_subtype":"misspelling","personalized_feedback":"Check SELECT."}"#;
    let mut profile = profile_json();
    profile["emotion"] = json!("ANGRY");
    let request = post(
        "/api/feedback",
        &json!({ "query": QUERY, "profile": profile }),
    );
    let (status, body) = send(app(reply), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["error_subtype"], "misspelling");
}

#[tokio::test]
async fn test_malformed_body_is_json_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/feedback")
        .header("content-type", "application/json")
        .body(Body::from("{\"query\": "))
        .unwrap();
    let (status, body) = send(app("{}"), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error_kind"], "InvalidArgumentError");
}

#[tokio::test]
async fn test_search_without_k_uses_default() {
    let request = post("/api/search", &json!({ "query": QUERY }));
    let (status, body) = send(app("{}"), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}
