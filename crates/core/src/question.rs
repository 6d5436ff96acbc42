//! Reflective question model and answer validation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{DocId, Timestamp};

/// Maximum answer length in characters.
pub const MAX_ANSWER_LENGTH: usize = 10_000;

/// What a generated question is probing for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum QuestionKind {
    Followup,
    Detail,
    Gap,
    Reflection,
    People,
    Other,
}

impl QuestionKind {
    /// Convert to the stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Followup => "followup",
            Self::Detail => "detail",
            Self::Gap => "gap",
            Self::Reflection => "reflection",
            Self::People => "people",
            Self::Other => "other",
        }
    }
}

/// A reflective question presented to the user.
///
/// Invariant: once `answered` is true, `answer` is non-null. The answer
/// path writes all three answer fields in one partial update, so a stored
/// document never has `answered=true` with a missing answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AiQuestion {
    #[serde(default)]
    pub id: DocId,
    pub question: String,
    #[serde(default)]
    pub related_entry: Option<DocId>,
    pub kind: QuestionKind,
    #[serde(default)]
    pub answered: bool,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub answered_at: Option<Timestamp>,
}

/// Validate answer text: non-blank, within the length limit.
///
/// Answering an already-answered question is allowed and overwrites the
/// previous answer; only blank text is refused.
pub fn validate_answer(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Answer cannot be empty".to_string());
    }
    if content.chars().count() > MAX_ANSWER_LENGTH {
        return Err(format!(
            "Answer exceeds maximum length of {MAX_ANSWER_LENGTH} characters"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
