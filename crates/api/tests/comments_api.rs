//! Integration tests for entry comments and likes.

mod common;

use axum::http::StatusCode;
use common::{auth_token, body_json, get, post_json};
use serde_json::json;

const OWNER: &str = "owner-comments";

/// Create one entry and return its id.
async fn seeded_entry(app: &axum::Router, token: &str) -> String {
    let created = body_json(
        post_json(
            app,
            "/api/v1/entries",
            token,
            json!({
                "title": "The allotment years",
                "content": "We grew everything ourselves.",
                "date": "1978-04-01",
            }),
        )
        .await,
    )
    .await;
    created["data"]["id"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Adding comments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_comment_returns_the_updated_entry() {
    let (app, state) = common::build_test_app();
    let token = auth_token(&state, OWNER, "Margaret");
    let id = seeded_entry(&app, &token).await;

    let response = post_json(
        &app,
        &format!("/api/v1/entries/{id}/comments"),
        &token,
        json!({"content": "I remember those tomatoes."}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let comments = json["data"]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["content"], "I remember those tomatoes.");
    assert_eq!(comments[0]["likes"], 0);
    assert!(!comments[0]["id"].as_str().unwrap().is_empty());
    // No author in the body: the signed-in name is used.
    assert_eq!(comments[0]["author"], "Margaret");
}

#[tokio::test]
async fn comment_author_can_be_overridden_per_comment() {
    let (app, state) = common::build_test_app();
    let token = auth_token(&state, OWNER, "Margaret");
    let id = seeded_entry(&app, &token).await;

    let response = post_json(
        &app,
        &format!("/api/v1/entries/{id}/comments"),
        &token,
        json!({"author": "Grandson Tim", "content": "Grandma, write more of these!"}),
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json["data"]["comments"][0]["author"], "Grandson Tim");
}

#[tokio::test]
async fn blank_comment_is_rejected_and_writes_nothing() {
    let (app, state) = common::build_test_app();
    let token = auth_token(&state, OWNER, "Margaret");
    let id = seeded_entry(&app, &token).await;

    let response = post_json(
        &app,
        &format!("/api/v1/entries/{id}/comments"),
        &token,
        json!({"content": "   "}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let entry = body_json(get(&app, &format!("/api/v1/entries/{id}"), &token).await).await;
    assert_eq!(entry["data"]["comments"], json!([]));
}

#[tokio::test]
async fn comment_on_a_missing_entry_is_404() {
    let (app, state) = common::build_test_app();
    let token = auth_token(&state, OWNER, "Margaret");

    let response = post_json(
        &app,
        "/api/v1/entries/no-such-entry/comments",
        &token,
        json!({"content": "Hello?"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Likes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn like_increments_only_the_target_comment() {
    let (app, state) = common::build_test_app();
    let token = auth_token(&state, OWNER, "Margaret");
    let id = seeded_entry(&app, &token).await;

    post_json(
        &app,
        &format!("/api/v1/entries/{id}/comments"),
        &token,
        json!({"content": "First comment."}),
    )
    .await;
    let with_two = body_json(
        post_json(
            &app,
            &format!("/api/v1/entries/{id}/comments"),
            &token,
            json!({"content": "Second comment."}),
        )
        .await,
    )
    .await;
    let first_id = with_two["data"]["comments"][0]["id"].as_str().unwrap();

    let response = post_json(
        &app,
        &format!("/api/v1/entries/{id}/comments/{first_id}/like"),
        &token,
        json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["comments"][0]["likes"], 1);
    assert_eq!(json["data"]["comments"][1]["likes"], 0);
}

#[tokio::test]
async fn likes_accumulate() {
    let (app, state) = common::build_test_app();
    let token = auth_token(&state, OWNER, "Margaret");
    let id = seeded_entry(&app, &token).await;

    let with_comment = body_json(
        post_json(
            &app,
            &format!("/api/v1/entries/{id}/comments"),
            &token,
            json!({"content": "Much loved."}),
        )
        .await,
    )
    .await;
    let comment_id = with_comment["data"]["comments"][0]["id"].as_str().unwrap();
    let like_path = format!("/api/v1/entries/{id}/comments/{comment_id}/like");

    post_json(&app, &like_path, &token, json!({})).await;
    let second = body_json(post_json(&app, &like_path, &token, json!({})).await).await;

    assert_eq!(second["data"]["comments"][0]["likes"], 2);
}

#[tokio::test]
async fn liking_an_unknown_comment_is_404() {
    let (app, state) = common::build_test_app();
    let token = auth_token(&state, OWNER, "Margaret");
    let id = seeded_entry(&app, &token).await;

    let response = post_json(
        &app,
        &format!("/api/v1/entries/{id}/comments/no-such-comment/like"),
        &token,
        json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let error = body_json(response).await;
    assert!(error["error"].as_str().unwrap().contains("comment"));
}
