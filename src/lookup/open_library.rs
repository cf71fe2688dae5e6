//! Open Library book search.

use anyhow::{Context, Result};
use serde::Deserialize;

use super::Candidate;

const SEARCH_URL: &str = "https://openlibrary.org/search.json";
const COVER_BASE_URL: &str = "https://covers.openlibrary.org/b/id";
const RESULT_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<Doc>,
}

#[derive(Debug, Deserialize)]
struct Doc {
    title: Option<String>,
    #[serde(default)]
    author_name: Vec<String>,
    first_publish_year: Option<i64>,
    cover_i: Option<i64>,
    key: Option<String>,
    #[serde(default)]
    isbn: Vec<String>,
}

pub(super) async fn search(http: &reqwest::Client, query: &str) -> Result<Vec<Candidate>> {
    let response = http
        .get(SEARCH_URL)
        .query(&[("q", query), ("limit", "10")])
        .send()
        .await
        .context("open library request failed")?
        .error_for_status()
        .context("open library rejected the request")?;

    let payload: SearchResponse = response
        .json()
        .await
        .context("open library returned malformed JSON")?;

    Ok(candidates_from(payload))
}

fn candidates_from(payload: SearchResponse) -> Vec<Candidate> {
    payload
        .docs
        .into_iter()
        .filter_map(|doc| {
            let title = doc.title?;
            let reference = serde_json::json!({
                "type": "openlibrary",
                "key": doc.key,
                "isbn": doc.isbn.first(),
            });
            Some(Candidate {
                title,
                detail: doc.author_name.first().cloned(),
                year: doc.first_publish_year.map(|year| year.to_string()),
                cover_url: doc
                    .cover_i
                    .map(|cover| format!("{COVER_BASE_URL}/{cover}-M.jpg")),
                reference: Some(reference),
            })
        })
        .take(RESULT_LIMIT)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_docs_to_candidates() {
        let payload: SearchResponse = serde_json::from_str(
            r#"{
                "docs": [
                    {
                        "title": "Project Hail Mary",
                        "author_name": ["Andy Weir"],
                        "first_publish_year": 2021,
                        "cover_i": 11447160,
                        "key": "/works/OL21058613W",
                        "isbn": ["9780593135204"]
                    },
                    { "author_name": ["No Title"] }
                ]
            }"#,
        )
        .unwrap();

        let candidates = candidates_from(payload);
        assert_eq!(candidates.len(), 1, "a doc without a title is skipped");

        let candidate = &candidates[0];
        assert_eq!(candidate.title, "Project Hail Mary");
        assert_eq!(candidate.detail.as_deref(), Some("Andy Weir"));
        assert_eq!(candidate.year.as_deref(), Some("2021"));
        assert_eq!(
            candidate.cover_url.as_deref(),
            Some("https://covers.openlibrary.org/b/id/11447160-M.jpg")
        );
        assert_eq!(
            candidate.reference,
            Some(serde_json::json!({
                "type": "openlibrary",
                "key": "/works/OL21058613W",
                "isbn": "9780593135204",
            }))
        );
    }

    #[test]
    fn empty_payload_yields_no_candidates() {
        let payload: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(candidates_from(payload).is_empty());
    }

    #[test]
    fn results_are_capped() {
        let doc = r#"{"title": "T", "author_name": [], "isbn": []}"#;
        let docs = vec![doc; 14].join(",");
        let payload: SearchResponse =
            serde_json::from_str(&format!(r#"{{"docs": [{docs}]}}"#)).unwrap();
        assert_eq!(candidates_from(payload).len(), RESULT_LIMIT);
    }
}
