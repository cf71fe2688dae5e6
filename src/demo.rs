//! The fixed demonstration dataset the overlay substitutes for real data:
//! a week of ratings, fifteen log entries, and one catalog record per
//! distinct (name, format) pair.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::db::models::{HappinessRating, MediaEntry, Source};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoData {
    pub happiness_ratings: Vec<HappinessRating>,
    pub media_entries: Vec<MediaEntry>,
    pub media_sources: Vec<Source>,
}

pub fn dataset() -> Result<DemoData> {
    serde_json::from_str(include_str!("demo_data.json"))
        .context("failed to parse embedded demo dataset")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn dataset_parses_and_is_internally_consistent() {
        let demo = dataset().unwrap();
        assert_eq!(demo.happiness_ratings.len(), 7);
        assert_eq!(demo.media_entries.len(), 15);
        assert_eq!(demo.media_sources.len(), 15);

        // One rating per day.
        let days: HashSet<_> = demo.happiness_ratings.iter().map(|r| r.date).collect();
        assert_eq!(days.len(), demo.happiness_ratings.len());

        // Every entry has a catalog record under the same (name, format).
        for entry in &demo.media_entries {
            assert!(
                demo.media_sources
                    .iter()
                    .any(|s| s.matches(&entry.name, entry.format)),
                "no source for {}",
                entry.name
            );
        }

        // Sources are unique by compound key and each counts one use.
        let keys: HashSet<_> = demo
            .media_sources
            .iter()
            .map(|s| (s.name.clone(), s.format))
            .collect();
        assert_eq!(keys.len(), demo.media_sources.len());
        assert!(demo.media_sources.iter().all(|s| s.use_count == 1));
    }
}
