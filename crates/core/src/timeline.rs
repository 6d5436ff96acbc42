//! Timeline aggregation: year-bucketed life events, newest year first.
//!
//! Timeline events arrive through the document store and are read-only on
//! this surface; the only action a year offers is triggering prompt
//! generation, which is a separate side effect and not part of the
//! aggregation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::DocId;

/// One stored timeline document: a year and its short event descriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TimelineEvent {
    #[serde(default)]
    pub id: DocId,
    pub year: i32,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// A year bucket ready for display.
///
/// Years without events are kept, with `has_events` false, so clients render
/// an explicit "no events" placeholder instead of dropping the year.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct TimelineYear {
    pub id: DocId,
    pub year: i32,
    pub events: Vec<String>,
    pub color: Option<String>,
    pub has_events: bool,
}

/// Order timeline events by year descending.
///
/// Blank event descriptions are dropped; the year itself is never dropped.
/// Years appearing in several documents stay separate buckets, in their
/// incoming relative order (stable sort).
pub fn aggregate_timeline(events: &[TimelineEvent]) -> Vec<TimelineYear> {
    let mut years: Vec<TimelineYear> = events
        .iter()
        .map(|e| {
            let descriptions: Vec<String> = e
                .events
                .iter()
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect();
            TimelineYear {
                id: e.id.clone(),
                year: e.year,
                has_events: !descriptions.is_empty(),
                events: descriptions,
                color: e.color.clone(),
            }
        })
        .collect();

    years.sort_by(|a, b| b.year.cmp(&a.year));
    years
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
