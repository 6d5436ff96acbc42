//! Route definitions for the `/photo-requests` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::photo_requests;
use crate::state::AppState;

/// Routes mounted at `/photo-requests`.
///
/// ```text
/// GET  /                 -> list_requests
/// POST /                 -> submit_request
/// POST /{id}/respond     -> respond_to_request
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(photo_requests::list_requests).post(photo_requests::submit_request),
        )
        .route("/{id}/respond", post(photo_requests::respond_to_request))
}
