//! Places adapter backed by SerpApi's Google Local engine
//!
//! Searches "top cafes restaurants in {area} {city}" and formats each local
//! result as a display string with its rating.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::adapters::{AdapterError, PlacesSource};
use crate::pulse::types::AreaQuery;

const DEFAULT_BASE_URL: &str = "https://serpapi.com";

/// SerpApi local-business search client
#[derive(Clone)]
pub struct LocalPlacesClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl LocalPlacesClient {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl PlacesSource for LocalPlacesClient {
    async fn top_places(&self, query: &AreaQuery) -> Result<Vec<String>, AdapterError> {
        let terms = query.places_terms();
        debug!(query = %terms, "Fetching local places");

        let response = self
            .http
            .get(format!("{}/search.json", self.base_url))
            .query(&[
                ("engine", "google_local"),
                ("q", terms.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AdapterError::Status(response.status().as_u16()));
        }

        let body: LocalSearchResponse = response
            .json()
            .await
            .map_err(|e| AdapterError::InvalidResponse(e.to_string()))?;

        Ok(extract_places(body))
    }
}

#[derive(Debug, Deserialize)]
struct LocalSearchResponse {
    #[serde(default)]
    local_results: Vec<LocalResult>,
}

#[derive(Debug, Deserialize)]
struct LocalResult {
    title: Option<String>,
    rating: Option<f64>,
}

/// Format local results as "{name} (Rating: {rating|N/A})" in source order
fn extract_places(body: LocalSearchResponse) -> Vec<String> {
    body.local_results
        .into_iter()
        .filter_map(|result| result.title.map(|title| format_place(&title, result.rating)))
        .collect()
}

fn format_place(title: &str, rating: Option<f64>) -> String {
    match rating {
        Some(rating) => format!("{} (Rating: {})", title, rating),
        None => format!("{} (Rating: N/A)", title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_place() {
        assert_eq!(
            format_place("Third Wave Coffee", Some(4.5)),
            "Third Wave Coffee (Rating: 4.5)"
        );
        assert_eq!(format_place("New Bakery", None), "New Bakery (Rating: N/A)");
    }

    #[test]
    fn test_extract_places() {
        let body: LocalSearchResponse = serde_json::from_str(
            r#"{
                "local_results": [
                    {"title": "Third Wave Coffee", "rating": 4.5},
                    {"title": "New Bakery"},
                    {"rating": 4.0}
                ]
            }"#,
        )
        .unwrap();

        let places = extract_places(body);
        assert_eq!(
            places,
            vec![
                "Third Wave Coffee (Rating: 4.5)".to_string(),
                "New Bakery (Rating: N/A)".to_string(),
            ]
        );
    }
}
