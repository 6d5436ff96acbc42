//! Handlers for reflective questions.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use ts_rs::TS;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for answering a question.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct AnswerRequest {
    pub answer: String,
}

/// GET /questions
///
/// List the owner's questions, oldest first.
pub async fn list_questions(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let questions = state.questions.list(&auth.owner_id).await?;

    Ok(Json(DataResponse { data: questions }))
}

/// POST /questions/{id}/answer
///
/// Record an answer and mark the question answered. Answering again
/// overwrites the previous answer.
pub async fn answer_question(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AnswerRequest>,
) -> AppResult<impl IntoResponse> {
    let question = state
        .questions
        .answer(&auth.owner_id, &id, &input.answer)
        .await?;

    Ok(Json(DataResponse { data: question }))
}
