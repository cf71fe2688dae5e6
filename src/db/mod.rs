pub mod connection;
pub mod migrations;
pub mod models;
pub mod records;
pub mod repositories;

pub use connection::Database;

#[cfg(test)]
pub(crate) mod testing {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::connection::Database;

    /// Open a database at a per-invocation temp path so parallel tests
    /// don't collide.
    pub(crate) fn temp_database() -> Database {
        let pid = std::process::id();
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("mediamood-test-{pid}-{ts}.sqlite3"));
        Database::new(path).unwrap()
    }
}
