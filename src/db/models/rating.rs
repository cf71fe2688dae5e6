use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Happiness scale bounds. One rating covers one calendar day.
pub const MIN_HAPPINESS: i8 = -2;
pub const MAX_HAPPINESS: i8 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HappinessRating {
    /// Calendar day the rating applies to; the identity key.
    pub date: NaiveDate,
    pub happiness: i8,
    pub created_at: DateTime<Utc>,
    /// Set when an existing day is re-rated; absent on first write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Whether an upsert inserted a fresh record or rewrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Updated,
}

impl WriteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteOutcome::Created => "created",
            WriteOutcome::Updated => "updated",
        }
    }
}
