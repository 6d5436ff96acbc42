//! Route definitions for the `/questions` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::questions;
use crate::state::AppState;

/// Routes mounted at `/questions`.
///
/// ```text
/// GET  /               -> list_questions
/// POST /{id}/answer    -> answer_question
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(questions::list_questions))
        .route("/{id}/answer", post(questions::answer_question))
}
