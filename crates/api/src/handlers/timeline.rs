//! Handlers for the life timeline.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /timeline
///
/// The owner's timeline events rolled up by year, newest year first.
pub async fn list_years(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let years = state.timeline.years(&auth.owner_id).await?;

    Ok(Json(DataResponse { data: years }))
}

/// POST /timeline/{year}/questions
///
/// Generate the reflective questions for a year the owner picked on the
/// timeline, and store them as pending.
pub async fn generate_questions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let questions = state.questions.generate_for_year(&auth.owner_id, year).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: questions })))
}
