//! Catalog lookup: resolve a free-text title against a public catalog so a
//! source can be created pre-filled with a cover and provider reference.
//!
//! Providers contribute no state logic. Transport and parse failures
//! collapse to an empty candidate list — the manual-entry path has to keep
//! working when a catalog is down — and `reference` payloads are carried
//! verbatim, never interpreted.

mod omdb;
mod open_library;

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex,
};
use std::time::Duration;

use log::{debug, warn};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::db::models::Format;

/// Queries shorter than this resolve to no candidates without a request.
pub const MIN_QUERY_LEN: usize = 2;

/// Pause after the last input change before a request goes out.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// One candidate record from a catalog, at most ten per query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub title: String,
    /// Secondary display line: the author for books, the year for movies.
    pub detail: Option<String>,
    pub year: Option<String>,
    pub cover_url: Option<String>,
    /// Opaque provider payload, stored on the source untouched.
    pub reference: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    omdb_api_key: Option<String>,
}

impl CatalogClient {
    pub fn new(omdb_api_key: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self { http, omdb_api_key }
    }

    /// Look a query up with the provider for its format. Formats without a
    /// provider, and any provider failure, yield an empty list.
    pub async fn search(&self, format: Format, query: &str) -> Vec<Candidate> {
        let result = match format {
            Format::Book => open_library::search(&self.http, query).await,
            Format::Movie => match self.omdb_api_key.as_deref() {
                Some(key) => omdb::search(&self.http, key, query).await,
                None => {
                    debug!("no OMDb API key configured; skipping movie lookup");
                    Ok(Vec::new())
                }
            },
            _ => Ok(Vec::new()),
        };

        match result {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(
                    "{} lookup for {query:?} failed: {err:#}",
                    format.as_str()
                );
                Vec::new()
            }
        }
    }
}

/// Drives lookups for one input field: debounces keystrokes and makes sure
/// a stale response can never land on top of a newer query's results.
///
/// Each `query` call starts a new generation and cancels the previous
/// one's token; a superseded call resolves to `None` so the caller simply
/// drops it.
pub struct LookupSession {
    client: CatalogClient,
    debounce: Duration,
    generation: AtomicU64,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl LookupSession {
    pub fn new(client: CatalogClient, debounce: Duration) -> Self {
        Self {
            client,
            debounce,
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(None),
        }
    }

    /// Resolve candidates for the current input, or `None` when a newer
    /// query superseded this one while it waited or ran.
    pub async fn query(&self, format: Format, text: &str) -> Option<Vec<Candidate>> {
        let (generation, token) = self.begin();

        tokio::select! {
            _ = token.cancelled() => return None,
            _ = tokio::time::sleep(self.debounce) => {}
        }

        let trimmed = text.trim();
        if trimmed.len() < MIN_QUERY_LEN {
            return Some(Vec::new());
        }

        let results = tokio::select! {
            _ = token.cancelled() => return None,
            results = self.client.search(format, trimmed) => results,
        };

        if !self.is_current(generation) {
            return None;
        }
        Some(results)
    }

    fn begin(&self) -> (u64, CancellationToken) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();

        let mut guard = match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = guard.replace(token.clone()) {
            previous.cancel();
        }

        (generation, token)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}
