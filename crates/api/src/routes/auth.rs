//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /anonymous  -> anonymous_sign_in (public)
/// POST /token      -> token_sign_in (public)
/// GET  /me         -> me (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/anonymous", post(auth::anonymous_sign_in))
        .route("/token", post(auth::token_sign_in))
        .route("/me", get(auth::me))
}
