//! Handlers for journal entries and their comments.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use ts_rs::TS;

use memoir_core::entry::{EntryDraft, EntryKind};
use memoir_store::StoreError;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query and body structs
// ---------------------------------------------------------------------------

/// Query parameters for listing entries.
#[derive(Debug, Deserialize)]
pub struct EntryListParams {
    /// Free-text filter over title, content, location, and tags.
    #[serde(default)]
    pub q: Option<String>,
    /// Entry kind filter; omitted or `all` keeps every kind.
    #[serde(default)]
    pub kind: Option<String>,
}

/// Request body for adding a comment to an entry.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct CommentRequest {
    /// Display name of the commenter. Blank falls back to the signed-in name.
    #[serde(default)]
    pub author: Option<String>,
    pub content: String,
}

/// Resolve the `kind` query parameter. `all` means no kind filter.
fn parse_kind_filter(kind: Option<&str>) -> AppResult<Option<EntryKind>> {
    match kind {
        None | Some("all") => Ok(None),
        Some(value) => EntryKind::from_str_value(value)
            .map(Some)
            .map_err(AppError::BadRequest),
    }
}

// ---------------------------------------------------------------------------
// Entry handlers
// ---------------------------------------------------------------------------

/// GET /entries?q=&kind=
///
/// List the owner's entries, newest first, narrowed by the free-text query
/// and kind filter when present.
pub async fn list_entries(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<EntryListParams>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind_filter(params.kind.as_deref())?;
    let query = params.q.as_deref().unwrap_or_default();

    let entries = state.entries.filtered(&auth.owner_id, query, kind).await?;

    Ok(Json(DataResponse { data: entries }))
}

/// POST /entries
///
/// Create a new journal entry from a draft.
pub async fn create_entry(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(draft): Json<EntryDraft>,
) -> AppResult<impl IntoResponse> {
    let entry = state
        .entries
        .save(&auth.owner_id, &auth.name, draft, None)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// GET /entries/{id}
///
/// Get a single entry by id.
pub async fn get_entry(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let entry = state
        .entries
        .get(&auth.owner_id, &id)
        .await?
        .ok_or_else(|| StoreError::not_found("entry", id))?;

    Ok(Json(DataResponse { data: entry }))
}

/// PUT /entries/{id}
///
/// Overwrite an existing entry with a new draft. Comments on the entry are
/// kept as they are.
pub async fn update_entry(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<EntryDraft>,
) -> AppResult<impl IntoResponse> {
    let entry = state
        .entries
        .save(&auth.owner_id, &auth.name, draft, Some(&id))
        .await?;

    Ok(Json(DataResponse { data: entry }))
}

/// DELETE /entries/{id}
///
/// Delete an entry and the comments riding on it.
pub async fn delete_entry(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.entries.delete(&auth.owner_id, &id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Comment handlers
// ---------------------------------------------------------------------------

/// POST /entries/{id}/comments
///
/// Append a comment to an entry and return the updated entry.
pub async fn add_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CommentRequest>,
) -> AppResult<impl IntoResponse> {
    let author = input
        .author
        .as_deref()
        .map(str::trim)
        .filter(|author| !author.is_empty())
        .unwrap_or(&auth.name);

    let entry = state
        .entries
        .add_comment(&auth.owner_id, &id, author, &input.content)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// POST /entries/{id}/comments/{comment_id}/like
///
/// Add one like to a comment and return the updated entry.
pub async fn like_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, comment_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let entry = state
        .entries
        .like_comment(&auth.owner_id, &id, &comment_id)
        .await?;

    Ok(Json(DataResponse { data: entry }))
}
