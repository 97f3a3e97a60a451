//! Web-context adapter backed by SerpApi's generic Google engine
//!
//! Runs a "what is happening in {area} {city}" search and collects the
//! non-empty organic result snippets.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::adapters::{AdapterError, WebContextSource};
use crate::pulse::types::AreaQuery;

const DEFAULT_BASE_URL: &str = "https://serpapi.com";

/// SerpApi web search client
#[derive(Clone)]
pub struct WebSearchClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl WebSearchClient {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl WebContextSource for WebSearchClient {
    async fn context_snippets(&self, query: &AreaQuery) -> Result<Vec<String>, AdapterError> {
        let terms = query.context_terms();
        debug!(query = %terms, "Fetching web context");

        let response = self
            .http
            .get(format!("{}/search.json", self.base_url))
            .query(&[
                ("engine", "google"),
                ("q", terms.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AdapterError::Status(response.status().as_u16()));
        }

        let body: WebSearchResponse = response
            .json()
            .await
            .map_err(|e| AdapterError::InvalidResponse(e.to_string()))?;

        Ok(extract_snippets(body))
    }
}

#[derive(Debug, Deserialize)]
struct WebSearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    snippet: Option<String>,
}

/// Collect non-empty snippets in source order
fn extract_snippets(body: WebSearchResponse) -> Vec<String> {
    body.organic_results
        .into_iter()
        .filter_map(|result| result.snippet)
        .filter(|snippet| !snippet.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_snippets_filters_empty() {
        let body: WebSearchResponse = serde_json::from_str(
            r#"{
                "organic_results": [
                    {"snippet": "Traffic diversions announced near the lake"},
                    {"snippet": ""},
                    {"title": "no snippet field"},
                    {"snippet": "Weekend flea market returns"}
                ]
            }"#,
        )
        .unwrap();

        let snippets = extract_snippets(body);
        assert_eq!(
            snippets,
            vec![
                "Traffic diversions announced near the lake".to_string(),
                "Weekend flea market returns".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_snippets_missing_results() {
        let body: WebSearchResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(extract_snippets(body).is_empty());
    }
}
