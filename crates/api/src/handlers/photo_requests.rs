//! Handlers for community photo requests.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use memoir_core::photo_request::PhotoRequestDraft;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /photo-requests
///
/// List the owner's photo requests.
pub async fn list_requests(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let requests = state.photo_requests.list(&auth.owner_id).await?;

    Ok(Json(DataResponse { data: requests }))
}

/// POST /photo-requests
///
/// Submit a new photo request. It starts out pending with no responses.
pub async fn submit_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(draft): Json<PhotoRequestDraft>,
) -> AppResult<impl IntoResponse> {
    let request = state.photo_requests.submit(&auth.owner_id, draft).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// POST /photo-requests/{id}/respond
///
/// Simulate a community member responding with a found photo. Whether the
/// new state is written back depends on `PERSIST_PHOTO_RESPONSES`.
pub async fn respond_to_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let request = state
        .photo_requests
        .simulate_response(&auth.owner_id, &id)
        .await?;

    Ok(Json(DataResponse { data: request }))
}
