//! Vibe summarizer
//!
//! Builds one natural-language prompt from the four lookup buckets, sends it
//! to a generative-text service, and derives a coarse mood label from the
//! returned text. When every bucket is empty the model is not called at all.

pub mod gemini;
pub mod mood;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::pulse::types::{AreaQuery, LookupBuckets};

pub use gemini::GeminiClient;
pub use mood::MoodLabel;

/// Fixed message returned when all four lookups came back empty
pub const NO_DATA_MESSAGE: &str = "Could not find recent data.";

/// Errors from the generative-text service
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream returned status {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Single-prompt-in, single-text-out completion service
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError>;
}

/// Generated summary plus derived mood label. Never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VibeReport {
    /// Markdown summary text (or an inline error / no-data message)
    pub summary: String,
    /// Mood derived from the summary text by keyword matching
    pub mood: MoodLabel,
}

/// Composes the prompt and turns model output into a vibe report
pub struct VibeSummarizer {
    generator: Arc<dyn TextGenerator>,
}

impl VibeSummarizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Summarize the four buckets for an area.
    ///
    /// Generator failure is surfaced as inline error text rather than an
    /// error; the pulse flow continues either way.
    pub async fn vibe_report(&self, query: &AreaQuery, buckets: &LookupBuckets) -> VibeReport {
        let summary = if buckets.is_empty() {
            NO_DATA_MESSAGE.to_string()
        } else {
            let prompt = build_prompt(query, buckets);
            match self.generator.generate(&prompt).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(area = %query.area(), error = %e, "Summarizer call failed");
                    format!("Error: {}", e)
                }
            }
        };

        let mood = mood::classify(&summary);

        VibeReport { summary, mood }
    }
}

/// Build the single instruction prompt embedding all four result sets
fn build_prompt(query: &AreaQuery, buckets: &LookupBuckets) -> String {
    let article_text = buckets
        .articles
        .iter()
        .map(|article| {
            format!(
                "{}. {}",
                article.title,
                article.description.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join(" ");

    let context_text = buckets.snippets.join(" ");
    let places_text = buckets.places.join(" | ");
    let weather_text = match &buckets.weather {
        Some(weather) => format!("Temp is {}°C with {}.", weather.temp_c, weather.condition),
        None => String::new(),
    };

    format!(
        "Analyze data for {area}, {city}. Output must be concise markdown. \
         1. Vibe summary. 2. \"Pulse Points\" (traffic, safety). \
         3. \"Top Spots\" (recommendations). 4. \"Weather & Attire\". \
         Data: News: \"{news}\", Web: \"{web}\", Places: \"{places}\", Weather: \"{weather}\"",
        area = query.area(),
        city = query.city(),
        news = article_text,
        web = context_text,
        places = places_text,
        weather = weather_text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pulse::types::{ArticleResult, WeatherReading};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockGenerator {
        calls: AtomicUsize,
        response: Result<String, ()>,
    }

    impl MockGenerator {
        fn returning(text: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Ok(text.to_string()),
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Err(()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for MockGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GeneratorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(GeneratorError::Status(503)),
            }
        }
    }

    fn query() -> AreaQuery {
        AreaQuery::new("koramangala", "Bangalore", "India").unwrap()
    }

    fn buckets_with_news_and_weather() -> LookupBuckets {
        LookupBuckets {
            articles: vec![
                ArticleResult {
                    title: "Metro line opens".into(),
                    description: Some("New stretch inaugurated".into()),
                },
                ArticleResult {
                    title: "Food festival".into(),
                    description: None,
                },
            ],
            snippets: Vec::new(),
            places: Vec::new(),
            weather: Some(WeatherReading {
                temp_c: 24.0,
                condition: "Partly cloudy".into(),
            }),
        }
    }

    #[tokio::test]
    async fn test_empty_buckets_skip_the_model() {
        let generator = Arc::new(MockGenerator::returning("unused"));
        let summarizer = VibeSummarizer::new(Arc::clone(&generator) as Arc<dyn TextGenerator>);

        let report = summarizer
            .vibe_report(&query(), &LookupBuckets::default())
            .await;

        assert_eq!(report.summary, NO_DATA_MESSAGE);
        assert_eq!(report.mood, MoodLabel::Calm);
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_model_called_once_with_embedded_data() {
        let generator = Arc::new(MockGenerator::returning(
            "A pleasant day in the neighborhood.",
        ));
        let summarizer = VibeSummarizer::new(Arc::clone(&generator) as Arc<dyn TextGenerator>);

        let report = summarizer
            .vibe_report(&query(), &buckets_with_news_and_weather())
            .await;

        assert_eq!(generator.call_count(), 1);
        // Output contains none of the mood keywords
        assert_eq!(report.mood, MoodLabel::Calm);

        let prompt = build_prompt(&query(), &buckets_with_news_and_weather());
        assert!(prompt.contains("Metro line opens. New stretch inaugurated"));
        assert!(prompt.contains("Food festival. "));
        assert!(prompt.contains("Temp is 24°C with Partly cloudy."));
        assert!(prompt.contains("koramangala"));
    }

    #[tokio::test]
    async fn test_generator_failure_becomes_inline_error() {
        let generator = Arc::new(MockGenerator::failing());
        let summarizer = VibeSummarizer::new(Arc::clone(&generator) as Arc<dyn TextGenerator>);

        let report = summarizer
            .vibe_report(&query(), &buckets_with_news_and_weather())
            .await;

        assert!(report.summary.starts_with("Error: "));
        assert!(report.summary.contains("503"));
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mood_derived_from_generated_text() {
        let generator = Arc::new(MockGenerator::returning(
            "The main street is buzzing with a weekend crowd.",
        ));
        let summarizer = VibeSummarizer::new(generator as Arc<dyn TextGenerator>);

        let report = summarizer
            .vibe_report(&query(), &buckets_with_news_and_weather())
            .await;

        assert_eq!(report.mood, MoodLabel::Active);
    }

    #[test]
    fn test_prompt_joins_buckets_with_separators() {
        let buckets = LookupBuckets {
            articles: Vec::new(),
            snippets: vec!["First snippet".into(), "Second snippet".into()],
            places: vec!["Cafe A (Rating: 4.5)".into(), "Cafe B (Rating: N/A)".into()],
            weather: None,
        };

        let prompt = build_prompt(&query(), &buckets);
        assert!(prompt.contains("First snippet Second snippet"));
        assert!(prompt.contains("Cafe A (Rating: 4.5) | Cafe B (Rating: N/A)"));
        assert!(prompt.contains("Weather: \"\""));
    }
}
