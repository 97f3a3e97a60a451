//! News adapter backed by NewsAPI
//!
//! Fetches the most relevant recent articles for `"{area} {city}"`.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::adapters::{AdapterError, NewsSource};
use crate::pulse::types::{AreaQuery, ArticleResult};

const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

/// Articles fetched per query
const PAGE_SIZE: usize = 5;

/// NewsAPI client
#[derive(Clone)]
pub struct NewsApiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl NewsApiClient {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn top_articles(&self, query: &AreaQuery) -> Result<Vec<ArticleResult>, AdapterError> {
        let terms = query.news_terms();
        let page_size = PAGE_SIZE.to_string();
        debug!(query = %terms, "Fetching news articles");

        let response = self
            .http
            .get(format!("{}/everything", self.base_url))
            .header("X-Api-Key", &self.api_key)
            .query(&[
                ("q", terms.as_str()),
                ("language", "en"),
                ("sortBy", "relevancy"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AdapterError::Status(response.status().as_u16()));
        }

        let body: NewsResponse = response
            .json()
            .await
            .map_err(|e| AdapterError::InvalidResponse(e.to_string()))?;

        Ok(extract_articles(body))
    }
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<NewsArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsArticle {
    title: Option<String>,
    description: Option<String>,
}

/// Keep articles with a title, in the relevance order the source returned
fn extract_articles(body: NewsResponse) -> Vec<ArticleResult> {
    body.articles
        .into_iter()
        .filter_map(|article| {
            article.title.map(|title| ArticleResult {
                title,
                description: article.description,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_articles() {
        let body: NewsResponse = serde_json::from_str(
            r#"{
                "status": "ok",
                "totalResults": 2,
                "articles": [
                    {"title": "Metro line opens", "description": "New stretch inaugurated"},
                    {"title": "Food festival", "description": null},
                    {"title": null, "description": "dropped - no title"}
                ]
            }"#,
        )
        .unwrap();

        let articles = extract_articles(body);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Metro line opens");
        assert_eq!(
            articles[0].description.as_deref(),
            Some("New stretch inaugurated")
        );
        assert!(articles[1].description.is_none());
    }

    #[test]
    fn test_extract_articles_empty_body() {
        let body: NewsResponse = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert!(extract_articles(body).is_empty());
    }
}
