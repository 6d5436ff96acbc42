//! Authentication middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated owner from a JWT Bearer token.

pub mod auth;
