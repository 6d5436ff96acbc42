//! Handlers for sign-in and identity.
//!
//! There are no accounts and no passwords. Anonymous sign-in mints a fresh
//! owner id; token sign-in re-validates a token the client kept from an
//! earlier session so the same journal opens again.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use memoir_core::entry::DEFAULT_AUTHOR_NAME;

use crate::auth::jwt::{generate_access_token, validate_token};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for anonymous sign-in.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct AnonymousSignIn {
    /// Display name for entries and comments. Blank falls back to
    /// `"Anonymous"`.
    #[serde(default)]
    pub name: Option<String>,
}

/// Request body for exchanging a kept token for a fresh one.
#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct TokenSignIn {
    pub token: String,
}

/// The signed-in identity as the frontend sees it.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
}

/// A freshly issued token plus the identity it names.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct AuthResponse {
    pub access_token: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
    pub user: UserInfo,
}

fn issue_token(state: &AppState, owner_id: &str, name: &str) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(owner_id, name, &state.config.jwt)
        .map_err(|err| AppError::InternalError(format!("Failed to sign token: {err}")))?;

    Ok(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: UserInfo {
            id: owner_id.to_string(),
            name: name.to_string(),
        },
    })
}

/// POST /auth/anonymous
///
/// Mint a fresh owner id and issue a token for it. The journal under that id
/// is reachable only by whoever holds the token.
pub async fn anonymous_sign_in(
    State(state): State<AppState>,
    Json(input): Json<AnonymousSignIn>,
) -> AppResult<impl IntoResponse> {
    let owner_id = Uuid::new_v4().to_string();
    let name = input
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_AUTHOR_NAME)
        .to_string();

    let response = issue_token(&state, &owner_id, &name)?;

    tracing::info!(owner = %owner_id, "Anonymous sign-in");

    Ok(Json(DataResponse { data: response }))
}

/// POST /auth/token
///
/// Exchange a still-valid token for a fresh one naming the same owner.
pub async fn token_sign_in(
    State(state): State<AppState>,
    Json(input): Json<TokenSignIn>,
) -> AppResult<impl IntoResponse> {
    let claims = validate_token(&input.token, &state.config.jwt)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    let response = issue_token(&state, &claims.sub, &claims.name)?;

    tracing::info!(owner = %claims.sub, "Token sign-in");

    Ok(Json(DataResponse { data: response }))
}

/// GET /auth/me
///
/// Echo the identity named by the presented token.
pub async fn me(user: AuthUser) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: UserInfo {
            id: user.owner_id,
            name: user.name,
        },
    }))
}
