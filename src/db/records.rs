//! Named JSON records over the two storage scopes.
//!
//! The persisted layout is deliberately simple: three independent named
//! records, each holding one JSON array. Durable records survive restarts;
//! session records live in a TEMP table and last exactly as long as the
//! process, which is where the demo-mode snapshot and flag are kept.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};

/// Durable record names.
pub const RATINGS: &str = "happinessRatings";
pub const MEDIA_ENTRIES: &str = "mediaEntries";
pub const SOURCES: &str = "mediaSources";

/// Session record names: snapshot copies of the three arrays above, plus
/// the demo-mode flag.
pub const SNAPSHOT_RATINGS: &str = "snapshot.happinessRatings";
pub const SNAPSHOT_MEDIA_ENTRIES: &str = "snapshot.mediaEntries";
pub const SNAPSHOT_SOURCES: &str = "snapshot.mediaSources";
pub const DEMO_FLAG: &str = "demoMode";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Durable,
    Session,
}

impl Scope {
    fn table(self) -> &'static str {
        match self {
            Scope::Durable => "records",
            Scope::Session => "session_records",
        }
    }
}

pub(crate) fn create_session_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TEMP TABLE IF NOT EXISTS session_records (
            name TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
    )?;
    Ok(())
}

/// Read a record as a typed array. A missing record reads as empty.
pub fn load<T: DeserializeOwned>(conn: &Connection, scope: Scope, name: &str) -> Result<Vec<T>> {
    let raw: Option<String> = conn
        .query_row(
            &format!("SELECT value FROM {} WHERE name = ?1", scope.table()),
            params![name],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("failed to read record {name}"))?;

    match raw {
        Some(json) => serde_json::from_str(&json)
            .with_context(|| format!("record {name} holds malformed JSON")),
        None => Ok(Vec::new()),
    }
}

/// Write a record, replacing any previous value under the same name.
pub fn save<T: Serialize>(conn: &Connection, scope: Scope, name: &str, items: &[T]) -> Result<()> {
    let json =
        serde_json::to_string(items).with_context(|| format!("failed to encode record {name}"))?;
    conn.execute(
        &format!(
            "INSERT INTO {} (name, value) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value",
            scope.table()
        ),
        params![name, json],
    )
    .with_context(|| format!("failed to write record {name}"))?;
    Ok(())
}

pub fn remove(conn: &Connection, scope: Scope, name: &str) -> Result<()> {
    conn.execute(
        &format!("DELETE FROM {} WHERE name = ?1", scope.table()),
        params![name],
    )
    .with_context(|| format!("failed to remove record {name}"))?;
    Ok(())
}

pub fn exists(conn: &Connection, scope: Scope, name: &str) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            &format!("SELECT 1 FROM {} WHERE name = ?1", scope.table()),
            params![name],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("failed to probe record {name}"))?;
    Ok(found.is_some())
}

pub fn set_flag(conn: &Connection, scope: Scope, name: &str, value: bool) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO {} (name, value) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value",
            scope.table()
        ),
        params![name, if value { "true" } else { "false" }],
    )
    .with_context(|| format!("failed to write flag {name}"))?;
    Ok(())
}

/// Read a boolean flag; a missing flag reads as false.
pub fn get_flag(conn: &Connection, scope: Scope, name: &str) -> Result<bool> {
    let raw: Option<String> = conn
        .query_row(
            &format!("SELECT value FROM {} WHERE name = ?1", scope.table()),
            params![name],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("failed to read flag {name}"))?;
    Ok(raw.as_deref() == Some("true"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::temp_database;

    #[tokio::test]
    async fn missing_record_reads_as_empty() {
        let db = temp_database();
        let items: Vec<String> = db
            .execute(|conn| load(conn, Scope::Durable, "nothingHere"))
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn save_replaces_previous_value() {
        let db = temp_database();
        db.execute(|conn| {
            save(conn, Scope::Durable, "numbers", &[1u32, 2, 3])?;
            save(conn, Scope::Durable, "numbers", &[9u32])?;
            let back: Vec<u32> = load(conn, Scope::Durable, "numbers")?;
            assert_eq!(back, vec![9]);
            Ok(())
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn scopes_are_independent() {
        let db = temp_database();
        db.execute(|conn| {
            save(conn, Scope::Durable, "shared", &["durable"])?;
            save(conn, Scope::Session, "shared", &["session"])?;
            let durable: Vec<String> = load(conn, Scope::Durable, "shared")?;
            let session: Vec<String> = load(conn, Scope::Session, "shared")?;
            assert_eq!(durable, vec!["durable"]);
            assert_eq!(session, vec!["session"]);
            Ok(())
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn flags_default_to_false() {
        let db = temp_database();
        db.execute(|conn| {
            assert!(!get_flag(conn, Scope::Session, DEMO_FLAG)?);
            set_flag(conn, Scope::Session, DEMO_FLAG, true)?;
            assert!(get_flag(conn, Scope::Session, DEMO_FLAG)?);
            Ok(())
        })
        .await
        .unwrap();
    }
}
