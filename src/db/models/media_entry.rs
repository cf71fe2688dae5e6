use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Format;

/// One logged consumption: what was watched/read/heard, and for how long.
///
/// `name` + `format` loosely reference a [`super::Source`]; the link is not
/// enforced, so an entry may outlive its source and must render without one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaEntry {
    /// Creation instant in epoch milliseconds, bumped on collision so ids
    /// stay unique and ordered without a central sequence.
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub format: Format,
    /// Minutes, always >= 1.
    pub duration: u32,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields of a new entry; id and creation time are assigned
/// by the store, and `date` is truncated to calendar-day granularity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaEntryDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub format: Format,
    pub duration: u32,
    pub date: DateTime<Utc>,
}
