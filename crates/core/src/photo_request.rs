//! Community photo request model and lifecycle.
//!
//! A request asks the community for historical photos of a place and time.
//! The lifecycle is two states: `pending` until a response arrives, then
//! `found`. Responses are simulated in this system (no real community
//! backend), which is why the count moves by exactly one per response.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{DocId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum location length in characters.
pub const MAX_REQUEST_LOCATION_LENGTH: usize = 200;

/// Maximum timeframe length in characters (free text like "summer 1975").
pub const MAX_REQUEST_TIMEFRAME_LENGTH: usize = 100;

/// Maximum description length in characters.
pub const MAX_REQUEST_DESCRIPTION_LENGTH: usize = 2_000;

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Photo request lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PhotoRequestStatus {
    #[default]
    Pending,
    Found,
}

impl PhotoRequestStatus {
    /// Convert to the stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Found => "found",
        }
    }
}

/// A community request for historical photos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PhotoRequest {
    #[serde(default)]
    pub id: DocId,
    pub location: String,
    pub timeframe: String,
    pub description: String,
    #[serde(default)]
    pub status: PhotoRequestStatus,
    #[serde(default)]
    pub responses: u32,
    pub requested_at: Timestamp,
}

/// The fields a user submits when opening a request.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct PhotoRequestDraft {
    pub location: String,
    pub timeframe: String,
    pub description: String,
}

// ---------------------------------------------------------------------------
// Validation and transitions
// ---------------------------------------------------------------------------

/// Validate a request draft: all three fields non-blank and within limits.
pub fn validate_request(draft: &PhotoRequestDraft) -> Result<(), String> {
    validate_field("Location", &draft.location, MAX_REQUEST_LOCATION_LENGTH)?;
    validate_field("Timeframe", &draft.timeframe, MAX_REQUEST_TIMEFRAME_LENGTH)?;
    validate_field(
        "Description",
        &draft.description,
        MAX_REQUEST_DESCRIPTION_LENGTH,
    )?;
    Ok(())
}

fn validate_field(name: &str, value: &str, max_len: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{name} cannot be empty"));
    }
    if value.chars().count() > max_len {
        return Err(format!(
            "{name} exceeds maximum length of {max_len} characters"
        ));
    }
    Ok(())
}

/// Apply one simulated community response: the request becomes `found` and
/// the response count moves up by exactly one.
pub fn apply_response(request: &PhotoRequest) -> PhotoRequest {
    PhotoRequest {
        status: PhotoRequestStatus::Found,
        responses: request.responses + 1,
        ..request.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
