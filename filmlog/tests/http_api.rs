//! HTTP chat gateway tests
//!
//! Exercise the axum router directly with `tower::ServiceExt::oneshot`,
//! no real network listener involved.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::util::ServiceExt;

use filmlog::engine::ConversationEngine;
use filmlog::{build_router, AppState};

async fn test_app() -> axum::Router {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    filmlog::db::init_tables(&pool)
        .await
        .expect("Failed to initialize schema");
    let engine = ConversationEngine::new(pool, None);
    build_router(AppState::new(engine))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Response is not valid JSON")
}

fn message_request(user_id: i64, text: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/message")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "user_id": user_id, "text": text }).to_string(),
        ))
        .expect("Failed to build request")
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].is_number());
}

#[tokio::test]
async fn start_message_returns_welcome_and_main_keyboard() {
    let app = test_app().await;

    let response = app
        .oneshot(message_request(1, "/start"))
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["text"]
        .as_str()
        .expect("text missing")
        .contains("Welcome"));

    let keyboard = body["keyboard"].as_array().expect("keyboard missing");
    let first_row = keyboard[0].as_array().expect("keyboard row missing");
    assert_eq!(first_row[0], "Add film");
}

#[tokio::test]
async fn reprompt_omits_the_keyboard_field() {
    let app = test_app().await;

    // /help keeps whatever keyboard is shown, so the reply carries none
    let response = app
        .oneshot(message_request(1, "/help"))
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["text"]
        .as_str()
        .expect("text missing")
        .contains("Allowed commands"));
    assert!(body.get("keyboard").is_none());
}

#[tokio::test]
async fn sessions_persist_across_requests() {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    filmlog::db::init_tables(&pool)
        .await
        .expect("Failed to initialize schema");
    let engine = ConversationEngine::new(pool, None);
    let state = AppState::new(engine);

    // One router per request; the state (and its session map) is shared
    for (text, expected) in [
        ("Add film", "Select a method to add a movie:"),
        ("Enter data manually", "Enter a movie title:"),
        ("The Matrix", "Enter movie rating (1 to 10):"),
    ] {
        let app = build_router(state.clone());
        let response = app
            .oneshot(message_request(7, text))
            .await
            .expect("Request failed");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["text"], expected);
    }
}

#[tokio::test]
async fn malformed_request_is_rejected() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/message")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"user_id": "not a number"}"#))
                .expect("Failed to build request"),
        )
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
