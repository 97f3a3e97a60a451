//! External lookup adapters
//!
//! Each adapter wraps exactly one external data source and returns a partial
//! result for the fan-out coordinator. Adapters report failures as
//! `AdapterError`; the coordinator converts any failure into an empty bucket
//! so one broken source never aborts its siblings.
//!
//! Production implementations are thin reqwest clients. Tests substitute
//! fakes implementing the same traits.

pub mod news;
pub mod places;
pub mod weather;
pub mod web_context;

use async_trait::async_trait;

use crate::pulse::types::{AreaQuery, ArticleResult, WeatherReading};

pub use news::NewsApiClient;
pub use places::LocalPlacesClient;
pub use weather::WeatherApiClient;
pub use web_context::WebSearchClient;

/// Errors from a single external lookup
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream returned status {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// News lookup: most-relevant recent articles for the area
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn top_articles(&self, query: &AreaQuery) -> Result<Vec<ArticleResult>, AdapterError>;
}

/// Generic web search: non-empty snippets describing what is happening
#[async_trait]
pub trait WebContextSource: Send + Sync {
    async fn context_snippets(&self, query: &AreaQuery) -> Result<Vec<String>, AdapterError>;
}

/// Local-business search: formatted place strings with ratings
#[async_trait]
pub trait PlacesSource: Send + Sync {
    async fn top_places(&self, query: &AreaQuery) -> Result<Vec<String>, AdapterError>;
}

/// Weather lookup: current conditions for the area
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current_weather(&self, query: &AreaQuery) -> Result<WeatherReading, AdapterError>;
}
