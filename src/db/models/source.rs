use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Format;

/// A reusable catalog record for something the user consumes repeatedly.
///
/// Identity is the `(name, format)` pair, case-sensitive exact match; two
/// sources with the same name but different formats are distinct records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub name: String,
    #[serde(rename = "type")]
    pub format: Format,
    /// Cover/thumbnail URL from a catalog lookup, when one was attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Opaque provider payload; stored and returned verbatim, never
    /// interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    /// `None` once usage has been forgotten; the record itself survives and
    /// stays searchable, it just drops out of the recency ranking.
    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(default)]
    pub use_count: u32,
}

impl Source {
    /// Compound-key match against another name/format pair.
    pub fn matches(&self, name: &str, format: Format) -> bool {
        self.name == name && self.format == format
    }
}
