//! Integration tests for photo requests and simulated responses.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{auth_token, body_json, get, post_json};
use memoir_api::state::AppState;
use memoir_store::MemoryStore;
use serde_json::json;

const OWNER: &str = "owner-photos";

fn request_body() -> serde_json::Value {
    json!({
        "location": "Lisbon",
        "timeframe": "summer 1975",
        "description": "The tiled house on the corner near the tram stop.",
    })
}

// ---------------------------------------------------------------------------
// Submitting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_returns_201_with_a_pending_request() {
    let (app, state) = common::build_test_app();
    let token = auth_token(&state, OWNER, "Margaret");

    let response = post_json(&app, "/api/v1/photo-requests", &token, request_body()).await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert!(!json["data"]["id"].as_str().unwrap().is_empty());
    assert_eq!(json["data"]["location"], "Lisbon");
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["responses"], 0);
    assert!(json["data"]["requested_at"].is_string());
}

#[tokio::test]
async fn blank_location_is_rejected_and_writes_nothing() {
    let (app, state) = common::build_test_app();
    let token = auth_token(&state, OWNER, "Margaret");

    let response = post_json(
        &app,
        "/api/v1/photo-requests",
        &token,
        json!({
            "location": "  ",
            "timeframe": "summer 1975",
            "description": "A house.",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let list = body_json(get(&app, "/api/v1/photo-requests", &token).await).await;
    assert_eq!(list["data"], json!([]));
}

// ---------------------------------------------------------------------------
// Simulated responses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn responding_marks_the_request_found() {
    let (app, state) = common::build_test_app();
    let token = auth_token(&state, OWNER, "Margaret");

    let created = body_json(
        post_json(&app, "/api/v1/photo-requests", &token, request_body()).await,
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap();

    let response = post_json(
        &app,
        &format!("/api/v1/photo-requests/{id}/respond"),
        &token,
        json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "found");
    assert_eq!(json["data"]["responses"], 1);

    // Responses are persisted under the default configuration.
    let listed = body_json(get(&app, "/api/v1/photo-requests", &token).await).await;
    assert_eq!(listed["data"][0]["status"], "found");
    assert_eq!(listed["data"][0]["responses"], 1);
}

#[tokio::test]
async fn repeated_responses_accumulate() {
    let (app, state) = common::build_test_app();
    let token = auth_token(&state, OWNER, "Margaret");

    let created = body_json(
        post_json(&app, "/api/v1/photo-requests", &token, request_body()).await,
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap();
    let respond_path = format!("/api/v1/photo-requests/{id}/respond");

    post_json(&app, &respond_path, &token, json!({})).await;
    let second = body_json(post_json(&app, &respond_path, &token, json!({})).await).await;

    assert_eq!(second["data"]["responses"], 2);
    assert_eq!(second["data"]["status"], "found");
}

#[tokio::test]
async fn responding_to_a_missing_request_is_404() {
    let (app, state) = common::build_test_app();
    let token = auth_token(&state, OWNER, "Margaret");

    let response = post_json(
        &app,
        "/api/v1/photo-requests/no-such-request/respond",
        &token,
        json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let error = body_json(response).await;
    assert!(error["error"].as_str().unwrap().contains("photo request"));
}

// ---------------------------------------------------------------------------
// Unpersisted mode
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unpersisted_mode_returns_the_response_without_writing() {
    let mut config = common::test_config();
    config.persist_photo_responses = false;
    let state = AppState::new(Arc::new(config), Arc::new(MemoryStore::new()));
    let app = common::build_app(state.clone());
    let token = auth_token(&state, OWNER, "Margaret");

    let created = body_json(
        post_json(&app, "/api/v1/photo-requests", &token, request_body()).await,
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap();

    let response = body_json(
        post_json(
            &app,
            &format!("/api/v1/photo-requests/{id}/respond"),
            &token,
            json!({}),
        )
        .await,
    )
    .await;
    assert_eq!(response["data"]["status"], "found");

    // The stored request did not move.
    let listed = body_json(get(&app, "/api/v1/photo-requests", &token).await).await;
    assert_eq!(listed["data"][0]["status"], "pending");
    assert_eq!(listed["data"][0]["responses"], 0);
}
