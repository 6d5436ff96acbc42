//! In-memory entry filtering and ordering.
//!
//! The entry list view filters and sorts client-side over the full
//! subscribed snapshot, so these are pure functions over a slice. They are
//! also what the HTTP list endpoint applies for `?q=` and `?kind=`.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::entry::{Entry, EntryKind, DATE_FORMAT};

/// Filter entries by free-text query and kind, then sort by date descending.
///
/// The query matches case-insensitively as a substring of the title, the
/// content, any tag, or the location (any one suffices). An empty query
/// matches everything. `kind` of `None` means all kinds.
pub fn filter_entries(entries: &[Entry], query: &str, kind: Option<EntryKind>) -> Vec<Entry> {
    let needle = query.to_lowercase();
    let matched: Vec<Entry> = entries
        .iter()
        .filter(|e| matches_query(e, &needle) && kind.map_or(true, |k| e.kind == k))
        .cloned()
        .collect();
    sort_by_date_descending(&matched)
}

/// Sort entries by date descending with a stable sort: entries sharing a
/// date keep their incoming relative order (no flicker on re-render).
/// Dates that fail to parse sort after all parseable dates.
pub fn sort_by_date_descending(entries: &[Entry]) -> Vec<Entry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| match (parse_date(&a.date), parse_date(&b.date)) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    sorted
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

/// `needle` must already be lowercased.
fn matches_query(entry: &Entry, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    entry.title.to_lowercase().contains(needle)
        || entry.content.to_lowercase().contains(needle)
        || entry.tags.iter().any(|t| t.to_lowercase().contains(needle))
        || entry.location.to_lowercase().contains(needle)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
