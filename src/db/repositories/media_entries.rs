use anyhow::{bail, Result};
use chrono::Utc;

use crate::db::{
    connection::Database,
    models::{MediaEntry, MediaEntryDraft},
    records::{self, Scope},
    repositories::sources::merge_source_usage,
};

impl Database {
    /// Log a consumption entry. Assigns the ordered id and creation time,
    /// truncates the date to its calendar day, and counts a usage for the
    /// `(name, format)` source in the same db task — the catalog and the
    /// log are kept loosely in sync this way, not via a foreign key.
    pub async fn add_media_entry(&self, draft: MediaEntryDraft) -> Result<MediaEntry> {
        self.execute(move |conn| {
            if draft.name.trim().is_empty() {
                bail!("media entry needs a name");
            }
            if draft.duration == 0 {
                bail!("duration must be at least one minute");
            }

            let now = Utc::now();
            let mut entries: Vec<MediaEntry> =
                records::load(conn, Scope::Durable, records::MEDIA_ENTRIES)?;

            // Creation instant in millis; bump past the newest existing id
            // so two entries logged in the same millisecond stay distinct
            // and ordered.
            let mut id = now.timestamp_millis();
            if let Some(max) = entries.iter().map(|e| e.id).max() {
                if id <= max {
                    id = max + 1;
                }
            }

            let entry = MediaEntry {
                id,
                name: draft.name.clone(),
                format: draft.format,
                duration: draft.duration,
                date: draft.date.date_naive(),
                created_at: now,
            };

            entries.push(entry.clone());
            records::save(conn, Scope::Durable, records::MEDIA_ENTRIES, &entries)?;

            merge_source_usage(conn, &draft.name, draft.format, None, None, now)?;

            Ok(entry)
        })
        .await
    }

    /// Remove an entry by id. Does nothing if the id is unknown.
    pub async fn delete_media_entry(&self, id: i64) -> Result<()> {
        self.execute(move |conn| {
            let mut entries: Vec<MediaEntry> =
                records::load(conn, Scope::Durable, records::MEDIA_ENTRIES)?;
            entries.retain(|e| e.id != id);
            records::save(conn, Scope::Durable, records::MEDIA_ENTRIES, &entries)?;
            Ok(())
        })
        .await
    }

    /// All entries in storage order.
    pub async fn list_media_entries(&self) -> Result<Vec<MediaEntry>> {
        self.execute(|conn| records::load(conn, Scope::Durable, records::MEDIA_ENTRIES))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Format;
    use crate::db::testing::temp_database;

    fn draft(name: &str, format: Format, duration: u32) -> MediaEntryDraft {
        MediaEntryDraft {
            name: name.to_string(),
            format,
            duration,
            date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn add_creates_the_source_on_first_reference() {
        let db = temp_database();
        db.add_media_entry(draft("Project Hail Mary", Format::Book, 240))
            .await
            .unwrap();

        let sources = db.list_sources().await.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].name, "Project Hail Mary");
        assert_eq!(sources[0].use_count, 1);
    }

    #[tokio::test]
    async fn ids_stay_unique_and_ordered_under_rapid_inserts() {
        let db = temp_database();
        let mut ids = Vec::new();
        for _ in 0..5 {
            let entry = db
                .add_media_entry(draft("lo-fi beats", Format::Music, 30))
                .await
                .unwrap();
            ids.push(entry.id);
        }

        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, ids, "ids must be strictly increasing");
        assert_eq!(ids.len(), 5);

        // Five logs of the same source merge into one catalog record.
        let sources = db.list_sources().await.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].use_count, 5);
    }

    #[tokio::test]
    async fn zero_duration_is_rejected() {
        let db = temp_database();
        let err = db
            .add_media_entry(draft("Inception", Format::Movie, 0))
            .await;
        assert!(err.is_err());
        assert!(db.list_media_entries().await.unwrap().is_empty());
        assert!(db.list_sources().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let db = temp_database();
        assert!(db.add_media_entry(draft("   ", Format::Movie, 90)).await.is_err());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let db = temp_database();
        let entry = db
            .add_media_entry(draft("The Daily", Format::Podcast, 25))
            .await
            .unwrap();

        db.delete_media_entry(entry.id).await.unwrap();
        db.delete_media_entry(entry.id).await.unwrap();
        assert!(db.list_media_entries().await.unwrap().is_empty());

        // The source record survives its entries.
        assert_eq!(db.list_sources().await.unwrap().len(), 1);
    }
}
