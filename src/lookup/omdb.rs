//! OMDb movie search. Needs an API key from <https://www.omdbapi.com/>.

use anyhow::{Context, Result};
use serde::Deserialize;

use super::Candidate;

const SEARCH_URL: &str = "https://www.omdbapi.com/";

// OMDb signals "no match" with Response: "False" and omits the Search
// array, and uses the literal "N/A" for a missing poster.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Search", default)]
    search: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
}

pub(super) async fn search(
    http: &reqwest::Client,
    api_key: &str,
    query: &str,
) -> Result<Vec<Candidate>> {
    let response = http
        .get(SEARCH_URL)
        .query(&[("apikey", api_key), ("s", query), ("type", "movie")])
        .send()
        .await
        .context("omdb request failed")?
        .error_for_status()
        .context("omdb rejected the request")?;

    let payload: SearchResponse = response
        .json()
        .await
        .context("omdb returned malformed JSON")?;

    Ok(candidates_from(payload))
}

fn candidates_from(payload: SearchResponse) -> Vec<Candidate> {
    if payload.response.as_deref() == Some("False") {
        return Vec::new();
    }

    payload
        .search
        .into_iter()
        .map(|item| {
            let reference = serde_json::json!({
                "type": "omdb",
                "imdbID": item.imdb_id,
            });
            Candidate {
                title: item.title,
                detail: item.year.clone(),
                year: item.year,
                cover_url: item.poster.filter(|poster| poster != "N/A"),
                reference: Some(reference),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_search_items_to_candidates() {
        let payload: SearchResponse = serde_json::from_str(
            r#"{
                "Response": "True",
                "Search": [
                    {
                        "Title": "Inception",
                        "Year": "2010",
                        "Poster": "https://m.media-amazon.com/images/inception.jpg",
                        "imdbID": "tt1375666"
                    },
                    { "Title": "Inception: The Cobol Job", "Year": "2010", "Poster": "N/A" }
                ]
            }"#,
        )
        .unwrap();

        let candidates = candidates_from(payload);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].title, "Inception");
        assert_eq!(
            candidates[0].cover_url.as_deref(),
            Some("https://m.media-amazon.com/images/inception.jpg")
        );
        assert_eq!(
            candidates[0].reference,
            Some(serde_json::json!({ "type": "omdb", "imdbID": "tt1375666" }))
        );
        assert!(candidates[1].cover_url.is_none(), "N/A poster reads as none");
    }

    #[test]
    fn no_match_response_yields_no_candidates() {
        let payload: SearchResponse =
            serde_json::from_str(r#"{ "Response": "False", "Error": "Movie not found!" }"#)
                .unwrap();
        assert!(candidates_from(payload).is_empty());
    }
}
