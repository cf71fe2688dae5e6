//! Storage and analytics core for a happiness x media consumption tracker.
//!
//! Three persisted record sets (daily happiness ratings, media log entries,
//! a reusable source catalog), a demo-data overlay that substitutes and
//! restores them losslessly, read-only analytics over the logs, and a
//! debounced catalog lookup client. An embedding shell owns the rendering;
//! everything stateful lives here.

pub mod analytics;
pub mod db;
pub mod demo;
pub mod lookup;
pub mod overlay;
pub mod settings;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

pub use analytics::{Analytics, CorrelationBand, SummaryStats};
pub use db::models::{
    Format, HappinessRating, MediaEntry, MediaEntryDraft, Source, WriteOutcome,
};
pub use db::Database;
pub use lookup::{Candidate, CatalogClient, LookupSession};
pub use overlay::{DemoOverlay, OverlayMode};
pub use settings::{LookupSettings, SettingsStore};

const DB_FILE: &str = "mediamood.sqlite3";
const SETTINGS_FILE: &str = "settings.json";

/// Initialize logging (reads RUST_LOG env var). Call once from the shell.
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}

/// Everything a shell needs, opened from one data directory.
pub struct Tracker {
    pub db: Database,
    pub overlay: DemoOverlay,
    pub analytics: Analytics,
    pub settings: SettingsStore,
}

impl Tracker {
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let db = Database::new(data_dir.join(DB_FILE))?;
        let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE))?;

        Ok(Self {
            overlay: DemoOverlay::new(db.clone()),
            analytics: Analytics::new(db.clone()),
            db,
            settings,
        })
    }

    /// Open under the platform data directory.
    pub fn open_default() -> Result<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| anyhow!("could not determine platform data directory"))?;
        Self::open(base.join("mediamood"))
    }

    /// A lookup driver configured from the current settings.
    pub fn lookup_session(&self) -> LookupSession {
        let lookup = self.settings.lookup();
        LookupSession::new(
            CatalogClient::new(lookup.omdb_api_key),
            Duration::from_millis(lookup.debounce_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[tokio::test]
    async fn tracker_opens_and_wires_the_stores_together() {
        let pid = std::process::id();
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("mediamood-tracker-{pid}-{ts}"));

        let tracker = Tracker::open(&dir).unwrap();
        tracker
            .db
            .upsert_rating(chrono::Utc::now(), 2)
            .await
            .unwrap();

        assert_eq!(
            tracker.analytics.summary_stats().await.unwrap().days_tracked,
            1
        );
        assert_eq!(tracker.overlay.mode().await.unwrap(), OverlayMode::Normal);
    }
}
