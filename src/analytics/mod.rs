//! Read-only projections over the stores: the chart series, the
//! correlation signal and the summary numbers.
//!
//! Every method reloads the current store contents — a render after a
//! mutation always sees fresh data, there is no cached series to go stale.

mod stats;

pub use stats::{
    average_duration_by_happiness, correlation, daily_duration, summary_stats, CorrelationBand,
    SummaryStats, HAPPINESS_LEVELS,
};

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::NaiveDate;

use crate::db::{
    connection::Database,
    models::{HappinessRating, MediaEntry},
    records::{self, Scope},
};

pub struct Analytics {
    db: Database,
}

impl Analytics {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// One consistent read of both logs from the same db task.
    async fn load_logs(&self) -> Result<(Vec<HappinessRating>, Vec<MediaEntry>)> {
        self.db
            .execute(|conn| {
                let ratings = records::load(conn, Scope::Durable, records::RATINGS)?;
                let entries = records::load(conn, Scope::Durable, records::MEDIA_ENTRIES)?;
                Ok((ratings, entries))
            })
            .await
    }

    pub async fn daily_duration(&self) -> Result<BTreeMap<NaiveDate, u64>> {
        let (_, entries) = self.load_logs().await?;
        Ok(stats::daily_duration(&entries))
    }

    pub async fn average_duration_by_happiness(&self) -> Result<BTreeMap<i8, f64>> {
        let (ratings, entries) = self.load_logs().await?;
        Ok(stats::average_duration_by_happiness(&ratings, &entries))
    }

    pub async fn correlation(&self) -> Result<f64> {
        let (ratings, entries) = self.load_logs().await?;
        Ok(stats::correlation(&ratings, &entries))
    }

    pub async fn summary_stats(&self) -> Result<SummaryStats> {
        let (ratings, entries) = self.load_logs().await?;
        Ok(stats::summary_stats(&ratings, &entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Format, MediaEntryDraft};
    use crate::db::testing::temp_database;
    use chrono::Utc;

    #[tokio::test]
    async fn projections_track_store_mutations() {
        let db = temp_database();
        let analytics = Analytics::new(db.clone());

        assert_eq!(analytics.summary_stats().await.unwrap().days_tracked, 0);

        db.upsert_rating(Utc::now(), 1).await.unwrap();
        let entry = db
            .add_media_entry(MediaEntryDraft {
                name: "The Daily".into(),
                format: Format::Podcast,
                duration: 25,
                date: Utc::now(),
            })
            .await
            .unwrap();

        let stats = analytics.summary_stats().await.unwrap();
        assert_eq!(stats.days_tracked, 1);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.total_duration_minutes, 25);

        // No caching: a delete shows up on the next read.
        db.delete_media_entry(entry.id).await.unwrap();
        let stats = analytics.summary_stats().await.unwrap();
        assert_eq!(stats.total_entries, 0);
        assert!(analytics.daily_duration().await.unwrap().is_empty());
    }
}
