pub mod auth;
pub mod entries;
pub mod health;
pub mod photo_requests;
pub mod questions;
pub mod timeline;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws/{collection}                           live snapshot WebSocket
///
/// /auth/anonymous                            anonymous sign-in (public)
/// /auth/token                                token sign-in (public)
/// /auth/me                                   identity echo (requires auth)
///
/// /entries                                   list (?q, kind), create
/// /entries/{id}                              get, update, delete
/// /entries/{id}/comments                     add comment (POST)
/// /entries/{id}/comments/{comment_id}/like   like comment (POST)
///
/// /timeline                                  years with events (GET)
/// /timeline/{year}/questions                 generate questions (POST)
///
/// /questions                                 list (GET)
/// /questions/{id}/answer                     answer (POST)
///
/// /photo-requests                            list, submit
/// /photo-requests/{id}/respond               simulate response (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Live snapshot WebSocket, one connection per collection.
        .route("/ws/{collection}", get(ws::watch_handler))
        // Sign-in and identity.
        .nest("/auth", auth::router())
        // Journal entries and their comments.
        .nest("/entries", entries::router())
        // Timeline years and per-year question generation.
        .nest("/timeline", timeline::router())
        // Reflective questions.
        .nest("/questions", questions::router())
        // Community photo requests.
        .nest("/photo-requests", photo_requests::router())
}
