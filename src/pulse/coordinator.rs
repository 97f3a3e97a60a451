//! Fan-out coordinator for the four external lookups
//!
//! Launches all four adapters concurrently for one query and rejoins at a
//! single wait-for-all barrier, so wall time tracks the slowest adapter
//! rather than the sum. Each adapter owns exactly one output bucket; a
//! failure is logged and leaves that bucket empty without touching the
//! others. There is no per-adapter timeout or cancellation here; outbound
//! request timeouts live on the shared HTTP client.

use std::sync::Arc;
use tracing::warn;

use crate::adapters::{NewsSource, PlacesSource, WeatherSource, WebContextSource};
use crate::pulse::types::{AreaQuery, LookupBuckets};

/// Runs the four lookup adapters concurrently for a single query
pub struct FanOutCoordinator {
    news: Arc<dyn NewsSource>,
    web_context: Arc<dyn WebContextSource>,
    places: Arc<dyn PlacesSource>,
    weather: Arc<dyn WeatherSource>,
}

impl FanOutCoordinator {
    pub fn new(
        news: Arc<dyn NewsSource>,
        web_context: Arc<dyn WebContextSource>,
        places: Arc<dyn PlacesSource>,
        weather: Arc<dyn WeatherSource>,
    ) -> Self {
        Self {
            news,
            web_context,
            places,
            weather,
        }
    }

    /// Run all four lookups and block until every one has finished
    pub async fn gather(&self, query: &AreaQuery) -> LookupBuckets {
        let (articles, snippets, places, weather) = tokio::join!(
            self.news.top_articles(query),
            self.web_context.context_snippets(query),
            self.places.top_places(query),
            self.weather.current_weather(query),
        );

        LookupBuckets {
            articles: articles.unwrap_or_else(|e| {
                warn!(area = %query.area(), error = %e, "News lookup failed");
                Vec::new()
            }),
            snippets: snippets.unwrap_or_else(|e| {
                warn!(area = %query.area(), error = %e, "Web context lookup failed");
                Vec::new()
            }),
            places: places.unwrap_or_else(|e| {
                warn!(area = %query.area(), error = %e, "Places lookup failed");
                Vec::new()
            }),
            weather: match weather {
                Ok(reading) => Some(reading),
                Err(e) => {
                    warn!(area = %query.area(), error = %e, "Weather lookup failed");
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::AdapterError;
    use crate::pulse::types::{ArticleResult, WeatherReading};
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::time::{sleep, Instant};

    struct MockNews {
        delay: Duration,
        fail: bool,
    }

    #[async_trait]
    impl NewsSource for MockNews {
        async fn top_articles(
            &self,
            _query: &AreaQuery,
        ) -> Result<Vec<ArticleResult>, AdapterError> {
            sleep(self.delay).await;
            if self.fail {
                return Err(AdapterError::Status(500));
            }
            Ok(vec![ArticleResult {
                title: "Metro line opens".into(),
                description: Some("New stretch inaugurated".into()),
            }])
        }
    }

    struct MockWeb {
        delay: Duration,
        fail: bool,
    }

    #[async_trait]
    impl WebContextSource for MockWeb {
        async fn context_snippets(&self, _query: &AreaQuery) -> Result<Vec<String>, AdapterError> {
            sleep(self.delay).await;
            if self.fail {
                return Err(AdapterError::Network("connection reset".into()));
            }
            Ok(vec!["Flea market this weekend".into()])
        }
    }

    struct MockPlaces {
        delay: Duration,
        fail: bool,
    }

    #[async_trait]
    impl PlacesSource for MockPlaces {
        async fn top_places(&self, _query: &AreaQuery) -> Result<Vec<String>, AdapterError> {
            sleep(self.delay).await;
            if self.fail {
                return Err(AdapterError::Status(429));
            }
            Ok(vec!["Third Wave Coffee (Rating: 4.5)".into()])
        }
    }

    struct MockWeather {
        delay: Duration,
        fail: bool,
    }

    #[async_trait]
    impl WeatherSource for MockWeather {
        async fn current_weather(
            &self,
            _query: &AreaQuery,
        ) -> Result<WeatherReading, AdapterError> {
            sleep(self.delay).await;
            if self.fail {
                return Err(AdapterError::InvalidResponse("missing current".into()));
            }
            Ok(WeatherReading {
                temp_c: 24.0,
                condition: "Partly cloudy".into(),
            })
        }
    }

    fn coordinator(
        news_fail: bool,
        web_fail: bool,
        places_fail: bool,
        weather_fail: bool,
        delays: [u64; 4],
    ) -> FanOutCoordinator {
        FanOutCoordinator::new(
            Arc::new(MockNews {
                delay: Duration::from_millis(delays[0]),
                fail: news_fail,
            }),
            Arc::new(MockWeb {
                delay: Duration::from_millis(delays[1]),
                fail: web_fail,
            }),
            Arc::new(MockPlaces {
                delay: Duration::from_millis(delays[2]),
                fail: places_fail,
            }),
            Arc::new(MockWeather {
                delay: Duration::from_millis(delays[3]),
                fail: weather_fail,
            }),
        )
    }

    fn query() -> AreaQuery {
        AreaQuery::new("koramangala", "Bangalore", "India").unwrap()
    }

    #[tokio::test]
    async fn test_all_adapters_populate_their_buckets() {
        let buckets = coordinator(false, false, false, false, [0, 0, 0, 0])
            .gather(&query())
            .await;

        assert_eq!(buckets.articles.len(), 1);
        assert_eq!(buckets.snippets.len(), 1);
        assert_eq!(buckets.places.len(), 1);
        assert!(buckets.weather.is_some());
    }

    #[tokio::test]
    async fn test_one_failure_leaves_siblings_untouched() {
        let buckets = coordinator(true, false, false, false, [0, 0, 0, 0])
            .gather(&query())
            .await;

        assert!(buckets.articles.is_empty());
        assert_eq!(buckets.snippets.len(), 1);
        assert_eq!(buckets.places.len(), 1);
        assert!(buckets.weather.is_some());
    }

    #[tokio::test]
    async fn test_weather_failure_yields_absent_reading() {
        let buckets = coordinator(false, false, false, true, [0, 0, 0, 0])
            .gather(&query())
            .await;

        assert!(buckets.weather.is_none());
        assert_eq!(buckets.articles.len(), 1);
    }

    #[tokio::test]
    async fn test_all_failures_yield_empty_buckets() {
        let buckets = coordinator(true, true, true, true, [0, 0, 0, 0])
            .gather(&query())
            .await;

        assert!(buckets.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fanout_wall_time_is_max_not_sum() {
        // Four distinct artificial delays; with paused time the elapsed
        // virtual duration equals the critical path of the join.
        let start = Instant::now();
        let buckets = coordinator(false, false, false, false, [50, 100, 150, 200])
            .gather(&query())
            .await;
        let elapsed = start.elapsed();

        assert!(!buckets.is_empty());
        assert!(elapsed >= Duration::from_millis(200));
        // Strictly below the 500ms sum of all four delays
        assert!(elapsed < Duration::from_millis(500));
    }
}
