//! Demo-data overlay: swaps the three durable records for the fixed
//! demonstration dataset and restores the user's own data losslessly.
//!
//! The overlay is the one owner of the mode; it is derived from the
//! session-scoped flag rather than kept in an ambient global. Both
//! transitions run as a single transaction on the db worker, so a caller
//! can never observe ratings restored but entries not.

use anyhow::Result;

use crate::db::{
    connection::Database,
    models::{HappinessRating, MediaEntry, Source},
    records::{self, Scope},
};
use crate::demo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayMode {
    Normal,
    Demo,
}

pub struct DemoOverlay {
    db: Database,
}

impl DemoOverlay {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn mode(&self) -> Result<OverlayMode> {
        self.db
            .execute(|conn| {
                Ok(
                    if records::get_flag(conn, Scope::Session, records::DEMO_FLAG)? {
                        OverlayMode::Demo
                    } else {
                        OverlayMode::Normal
                    },
                )
            })
            .await
    }

    /// Substitute the demonstration dataset for the user's data. A no-op
    /// when the overlay is already active. Real data is snapshotted into
    /// session scope first — unless a snapshot already exists, which must
    /// not be clobbered with demo data.
    pub async fn enter_demo(&self) -> Result<OverlayMode> {
        self.db
            .execute(|conn| {
                if records::get_flag(conn, Scope::Session, records::DEMO_FLAG)? {
                    return Ok(OverlayMode::Demo);
                }

                let demo = demo::dataset()?;
                let tx = conn.transaction()?;

                let ratings: Vec<HappinessRating> =
                    records::load(&tx, Scope::Durable, records::RATINGS)?;
                let entries: Vec<MediaEntry> =
                    records::load(&tx, Scope::Durable, records::MEDIA_ENTRIES)?;
                let sources: Vec<Source> =
                    records::load(&tx, Scope::Durable, records::SOURCES)?;

                let has_data =
                    !(ratings.is_empty() && entries.is_empty() && sources.is_empty());
                let snapshot_present =
                    records::exists(&tx, Scope::Session, records::SNAPSHOT_RATINGS)?
                        || records::exists(&tx, Scope::Session, records::SNAPSHOT_MEDIA_ENTRIES)?
                        || records::exists(&tx, Scope::Session, records::SNAPSHOT_SOURCES)?;

                if has_data && !snapshot_present {
                    records::save(&tx, Scope::Session, records::SNAPSHOT_RATINGS, &ratings)?;
                    records::save(
                        &tx,
                        Scope::Session,
                        records::SNAPSHOT_MEDIA_ENTRIES,
                        &entries,
                    )?;
                    records::save(&tx, Scope::Session, records::SNAPSHOT_SOURCES, &sources)?;
                }

                records::save(&tx, Scope::Durable, records::RATINGS, &demo.happiness_ratings)?;
                records::save(
                    &tx,
                    Scope::Durable,
                    records::MEDIA_ENTRIES,
                    &demo.media_entries,
                )?;
                records::save(&tx, Scope::Durable, records::SOURCES, &demo.media_sources)?;
                records::set_flag(&tx, Scope::Session, records::DEMO_FLAG, true)?;

                tx.commit()?;
                Ok(OverlayMode::Demo)
            })
            .await
    }

    /// Put the user's data back. A no-op when the overlay is not active.
    /// With a snapshot present, its contents are restored and the snapshot
    /// is consumed; without one the user had no data before, so the
    /// records are cleared rather than left holding the demo dataset.
    pub async fn exit_demo(&self) -> Result<OverlayMode> {
        self.db
            .execute(|conn| {
                if !records::get_flag(conn, Scope::Session, records::DEMO_FLAG)? {
                    return Ok(OverlayMode::Normal);
                }

                let tx = conn.transaction()?;

                let snapshot_present =
                    records::exists(&tx, Scope::Session, records::SNAPSHOT_RATINGS)?
                        || records::exists(&tx, Scope::Session, records::SNAPSHOT_MEDIA_ENTRIES)?
                        || records::exists(&tx, Scope::Session, records::SNAPSHOT_SOURCES)?;

                if snapshot_present {
                    let ratings: Vec<HappinessRating> =
                        records::load(&tx, Scope::Session, records::SNAPSHOT_RATINGS)?;
                    let entries: Vec<MediaEntry> =
                        records::load(&tx, Scope::Session, records::SNAPSHOT_MEDIA_ENTRIES)?;
                    let sources: Vec<Source> =
                        records::load(&tx, Scope::Session, records::SNAPSHOT_SOURCES)?;

                    records::save(&tx, Scope::Durable, records::RATINGS, &ratings)?;
                    records::save(&tx, Scope::Durable, records::MEDIA_ENTRIES, &entries)?;
                    records::save(&tx, Scope::Durable, records::SOURCES, &sources)?;

                    records::remove(&tx, Scope::Session, records::SNAPSHOT_RATINGS)?;
                    records::remove(&tx, Scope::Session, records::SNAPSHOT_MEDIA_ENTRIES)?;
                    records::remove(&tx, Scope::Session, records::SNAPSHOT_SOURCES)?;
                } else {
                    records::remove(&tx, Scope::Durable, records::RATINGS)?;
                    records::remove(&tx, Scope::Durable, records::MEDIA_ENTRIES)?;
                    records::remove(&tx, Scope::Durable, records::SOURCES)?;
                }

                records::set_flag(&tx, Scope::Session, records::DEMO_FLAG, false)?;

                tx.commit()?;
                Ok(OverlayMode::Normal)
            })
            .await
    }
}
