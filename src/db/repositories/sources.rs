use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::db::{
    connection::Database,
    models::{Format, Source},
    records::{self, Scope},
};

const MAX_SEARCH_RESULTS: usize = 10;

/// Merge-or-create a source for a `(name, format)` pair and count one usage.
///
/// Runs inside an existing db task so that logging a media entry can update
/// the catalog in the same step. `image_url`/`reference` overwrite prior
/// values when supplied and are preserved when absent.
pub(crate) fn merge_source_usage(
    conn: &Connection,
    name: &str,
    format: Format,
    image_url: Option<String>,
    reference: Option<serde_json::Value>,
    now: DateTime<Utc>,
) -> Result<()> {
    let mut sources: Vec<Source> = records::load(conn, Scope::Durable, records::SOURCES)?;

    match sources.iter_mut().find(|s| s.matches(name, format)) {
        Some(existing) => {
            existing.last_used = Some(now);
            existing.use_count += 1;
            if image_url.is_some() {
                existing.image_url = image_url;
            }
            if reference.is_some() {
                existing.reference = reference;
            }
        }
        None => sources.push(Source {
            name: name.to_string(),
            format,
            image_url,
            reference,
            created_at: now,
            last_used: Some(now),
            use_count: 1,
        }),
    }

    records::save(conn, Scope::Durable, records::SOURCES, &sources)
}

impl Database {
    /// Record one usage of a source, creating it on first reference.
    pub async fn record_source_usage(
        &self,
        name: String,
        format: Format,
        image_url: Option<String>,
        reference: Option<serde_json::Value>,
    ) -> Result<()> {
        self.execute(move |conn| {
            merge_source_usage(conn, &name, format, image_url, reference, Utc::now())
        })
        .await
    }

    /// Drop a source out of the recency ranking without deleting it: the
    /// record stays listed and searchable with zeroed usage.
    pub async fn forget_source_usage(&self, name: String, format: Format) -> Result<()> {
        self.execute(move |conn| {
            let mut sources: Vec<Source> =
                records::load(conn, Scope::Durable, records::SOURCES)?;
            if let Some(source) = sources.iter_mut().find(|s| s.matches(&name, format)) {
                source.use_count = 0;
                source.last_used = None;
            }
            records::save(conn, Scope::Durable, records::SOURCES, &sources)
        })
        .await
    }

    /// Hard removal. Entries referencing the source are left alone; they
    /// render without catalog metadata from then on.
    pub async fn delete_source(&self, name: String, format: Format) -> Result<()> {
        self.execute(move |conn| {
            let mut sources: Vec<Source> =
                records::load(conn, Scope::Durable, records::SOURCES)?;
            sources.retain(|s| !s.matches(&name, format));
            records::save(conn, Scope::Durable, records::SOURCES, &sources)
        })
        .await
    }

    /// Bulk "clear recents": zero usage on every record, delete none.
    pub async fn clear_all_source_usage(&self) -> Result<()> {
        self.execute(|conn| {
            let mut sources: Vec<Source> =
                records::load(conn, Scope::Durable, records::SOURCES)?;
            for source in &mut sources {
                source.use_count = 0;
                source.last_used = None;
            }
            records::save(conn, Scope::Durable, records::SOURCES, &sources)
        })
        .await
    }

    /// Up to `limit` sources with a recorded usage, most recent first.
    /// The sort is stable, so same-instant usages keep insertion order and
    /// repeated calls return the same ranking.
    pub async fn recent_sources(&self, limit: usize) -> Result<Vec<Source>> {
        self.execute(move |conn| {
            let mut sources: Vec<Source> =
                records::load(conn, Scope::Durable, records::SOURCES)?;
            sources.retain(|s| s.last_used.is_some());
            sources.sort_by(|a, b| b.last_used.cmp(&a.last_used));
            sources.truncate(limit);
            Ok(sources)
        })
        .await
    }

    /// Case-insensitive substring match against source names, capped at
    /// ten matches in storage order.
    pub async fn search_sources(&self, query: String) -> Result<Vec<Source>> {
        self.execute(move |conn| {
            let needle = query.to_lowercase();
            let sources: Vec<Source> = records::load(conn, Scope::Durable, records::SOURCES)?;
            Ok(sources
                .into_iter()
                .filter(|s| s.name.to_lowercase().contains(&needle))
                .take(MAX_SEARCH_RESULTS)
                .collect())
        })
        .await
    }

    /// All catalog records in storage order.
    pub async fn list_sources(&self) -> Result<Vec<Source>> {
        self.execute(|conn| records::load(conn, Scope::Durable, records::SOURCES))
            .await
    }
}
