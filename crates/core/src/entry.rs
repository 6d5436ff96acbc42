//! Journal entry model, validation, and comment helpers.
//!
//! An entry is one autobiographical record. Validation runs before any store
//! write: a draft that fails here must never reach the document store.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{DocId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum title length in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum content length in characters.
pub const MAX_CONTENT_LENGTH: usize = 50_000;

/// Maximum location length in characters.
pub const MAX_LOCATION_LENGTH: usize = 200;

/// Maximum number of tags per entry, counted after normalization.
pub const MAX_TAGS: usize = 25;

/// Maximum length of a single tag.
pub const MAX_TAG_LENGTH: usize = 50;

/// Maximum number of media URLs per entry.
pub const MAX_MEDIA_URLS: usize = 20;

/// Maximum comment length in characters.
pub const MAX_COMMENT_LENGTH: usize = 2_000;

/// Calendar date format for `Entry::date` (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Display name used when the author has none.
pub const DEFAULT_AUTHOR_NAME: &str = "Anonymous";

// ---------------------------------------------------------------------------
// Privacy
// ---------------------------------------------------------------------------

/// Who may see an entry. Stored on every entry but not enforced across
/// owners: all reads are scoped to the owner's own collections, so `friends`
/// and `public` are display hints for a future sharing surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Privacy {
    #[default]
    Private,
    Friends,
    Public,
}

impl Privacy {
    /// Convert to the stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Friends => "friends",
            Self::Public => "public",
        }
    }
}

// ---------------------------------------------------------------------------
// Entry kind
// ---------------------------------------------------------------------------

/// Entry kind string values.
pub const KIND_PERSONAL: &str = "personal";
pub const KIND_EVENT: &str = "event";
pub const KIND_REFLECTION: &str = "reflection";

/// All valid entry kinds.
pub const VALID_ENTRY_KINDS: &[&str] = &[KIND_PERSONAL, KIND_EVENT, KIND_REFLECTION];

/// What kind of record an entry is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EntryKind {
    #[default]
    Personal,
    Event,
    Reflection,
}

impl EntryKind {
    /// Parse a stored or user-supplied string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            KIND_PERSONAL => Ok(Self::Personal),
            KIND_EVENT => Ok(Self::Event),
            KIND_REFLECTION => Ok(Self::Reflection),
            _ => Err(format!(
                "Invalid entry kind '{s}'. Must be one of: {}",
                VALID_ENTRY_KINDS.join(", ")
            )),
        }
    }

    /// Convert to the stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => KIND_PERSONAL,
            Self::Event => KIND_EVENT,
            Self::Reflection => KIND_REFLECTION,
        }
    }
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

/// A single autobiographical record.
///
/// `date` stays a string in `YYYY-MM-DD` form because documents are
/// schemaless JSON; `validate_draft` guarantees it parses before any write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Entry {
    #[serde(default)]
    pub id: DocId,
    pub title: String,
    pub content: String,
    pub date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub privacy: Privacy,
    #[serde(default)]
    pub kind: EntryKind,
    #[serde(default)]
    pub media_urls: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub author_name: String,
    pub updated_at: Timestamp,
}

/// A comment on an entry. Appended, never deleted; likes only grow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Comment {
    pub id: DocId,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub likes: u32,
    pub created_at: Timestamp,
}

/// The author-controlled fields of an entry, as submitted by the edit form.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct EntryDraft {
    pub title: String,
    pub content: String,
    pub date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub privacy: Privacy,
    #[serde(default)]
    pub kind: EntryKind,
    #[serde(default)]
    pub media_urls: Vec<String>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a draft exactly as `save` would before writing.
///
/// Tag limits are checked on the normalized tag list, so a draft whose only
/// problem is duplicate or blank tags passes (normalization repairs it).
pub fn validate_draft(draft: &EntryDraft) -> Result<(), String> {
    validate_title(&draft.title)?;
    validate_content(&draft.content)?;
    validate_date(&draft.date)?;

    if draft.location.chars().count() > MAX_LOCATION_LENGTH {
        return Err(format!(
            "Location exceeds maximum length of {MAX_LOCATION_LENGTH} characters"
        ));
    }
    if draft.media_urls.len() > MAX_MEDIA_URLS {
        return Err(format!("At most {MAX_MEDIA_URLS} media URLs are allowed"));
    }

    let tags = normalize_tags(&draft.tags);
    if tags.len() > MAX_TAGS {
        return Err(format!("At most {MAX_TAGS} tags are allowed"));
    }
    for tag in &tags {
        if tag.chars().count() > MAX_TAG_LENGTH {
            return Err(format!(
                "Tag '{tag}' exceeds maximum length of {MAX_TAG_LENGTH} characters"
            ));
        }
    }

    Ok(())
}

/// Validate an entry title: non-blank, within the length limit.
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title cannot be empty".to_string());
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!(
            "Title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate entry content: non-blank, within the length limit.
pub fn validate_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Content cannot be empty".to_string());
    }
    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(format!(
            "Content exceeds maximum length of {MAX_CONTENT_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate that a date string is a real calendar date in `YYYY-MM-DD` form.
pub fn validate_date(date: &str) -> Result<(), String> {
    match chrono::NaiveDate::parse_from_str(date, DATE_FORMAT) {
        Ok(_) => Ok(()),
        Err(_) => Err(format!(
            "Date '{date}' is not a calendar date in YYYY-MM-DD form"
        )),
    }
}

/// Validate comment content: non-blank, within the length limit.
pub fn validate_comment_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Comment cannot be empty".to_string());
    }
    if content.chars().count() > MAX_COMMENT_LENGTH {
        return Err(format!(
            "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Normalize a tag list: trim each tag, drop blanks, and drop duplicates
/// keeping the first occurrence. Order is otherwise preserved.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() || out.iter().any(|t| t == trimmed) {
            continue;
        }
        out.push(trimmed.to_string());
    }
    out
}

// ---------------------------------------------------------------------------
// Comment helpers
// ---------------------------------------------------------------------------

/// Build a fresh comment with likes starting at zero.
pub fn new_comment(id: DocId, author: &str, content: &str, at: Timestamp) -> Comment {
    let author = author.trim();
    Comment {
        id,
        author: if author.is_empty() {
            DEFAULT_AUTHOR_NAME.to_string()
        } else {
            author.to_string()
        },
        content: content.to_string(),
        likes: 0,
        created_at: at,
    }
}

/// Replace the matching comment with a copy whose likes are incremented by
/// one, leaving every other comment untouched. Returns `None` when no
/// comment has the given id.
pub fn like_comment(comments: &[Comment], comment_id: &str) -> Option<Vec<Comment>> {
    let mut found = false;
    let updated = comments
        .iter()
        .map(|c| {
            if c.id == comment_id {
                found = true;
                Comment {
                    likes: c.likes + 1,
                    ..c.clone()
                }
            } else {
                c.clone()
            }
        })
        .collect();

    if found { Some(updated) } else { None }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
