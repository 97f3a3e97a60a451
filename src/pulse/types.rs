//! Core data types for the pulse lookup flow

use serde::{Deserialize, Serialize};

use crate::types::{PulseError, Result};

/// A normalized neighborhood query.
///
/// The raw area string is trimmed and lower-cased exactly once, here; every
/// adapter query string and the stored history value derive from this type,
/// so "Koramangala" and "koramangala" behave identically everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaQuery {
    area: String,
    city: String,
    country: String,
}

impl AreaQuery {
    /// Normalize a raw area string into a query.
    ///
    /// Returns `BadRequest` when the area is empty after trimming.
    pub fn new(raw_area: &str, city: &str, country: &str) -> Result<Self> {
        let area = raw_area.trim().to_lowercase();
        if area.is_empty() {
            return Err(PulseError::BadRequest("area must not be empty".into()));
        }

        Ok(Self {
            area,
            city: city.to_string(),
            country: country.to_string(),
        })
    }

    /// The normalized (lower-cased) area name, as stored in history
    pub fn area(&self) -> &str {
        &self.area
    }

    /// The configured city qualifier
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Title-cased area name for display
    pub fn display_name(&self) -> String {
        title_case(&self.area)
    }

    /// Keyword terms for the news lookup
    pub fn news_terms(&self) -> String {
        format!("{} {}", self.area, self.city)
    }

    /// Keyword terms for the web-context lookup
    pub fn context_terms(&self) -> String {
        format!("what is happening in {} {}", self.area, self.city)
    }

    /// Keyword terms for the places lookup
    pub fn places_terms(&self) -> String {
        format!("top cafes restaurants in {} {}", self.area, self.city)
    }

    /// Location string for the weather lookup
    pub fn weather_location(&self) -> String {
        format!("{},{}", self.area, self.country)
    }
}

/// Title-case a lower-cased area name for display ("hsr layout" -> "Hsr Layout")
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One news article from the news source, in relevance order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResult {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Current weather for the queried area
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReading {
    /// Temperature in degrees Celsius
    pub temp_c: f64,
    /// Human-readable condition text ("Partly cloudy")
    pub condition: String,
}

/// The four adapter output buffers, merged at the fan-out barrier.
///
/// Each bucket is written by exactly one adapter; a failed adapter leaves
/// its bucket empty and the others untouched.
#[derive(Debug, Clone, Default)]
pub struct LookupBuckets {
    pub articles: Vec<ArticleResult>,
    pub snippets: Vec<String>,
    pub places: Vec<String>,
    pub weather: Option<WeatherReading>,
}

impl LookupBuckets {
    /// True when every adapter came back empty-handed
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
            && self.snippets.is_empty()
            && self.places.is_empty()
            && self.weather.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_query_normalizes_case() {
        let upper = AreaQuery::new("Koramangala", "Bangalore", "India").unwrap();
        let lower = AreaQuery::new("koramangala", "Bangalore", "India").unwrap();

        assert_eq!(upper, lower);
        assert_eq!(upper.area(), "koramangala");
        assert_eq!(upper.news_terms(), lower.news_terms());
        assert_eq!(upper.context_terms(), lower.context_terms());
        assert_eq!(upper.places_terms(), lower.places_terms());
        assert_eq!(upper.weather_location(), lower.weather_location());
    }

    #[test]
    fn test_area_query_terms() {
        let query = AreaQuery::new(" Indiranagar ", "Bangalore", "India").unwrap();

        assert_eq!(query.news_terms(), "indiranagar Bangalore");
        assert_eq!(
            query.context_terms(),
            "what is happening in indiranagar Bangalore"
        );
        assert_eq!(
            query.places_terms(),
            "top cafes restaurants in indiranagar Bangalore"
        );
        assert_eq!(query.weather_location(), "indiranagar,India");
    }

    #[test]
    fn test_empty_area_rejected() {
        assert!(AreaQuery::new("   ", "Bangalore", "India").is_err());
        assert!(AreaQuery::new("", "Bangalore", "India").is_err());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("koramangala"), "Koramangala");
        assert_eq!(title_case("hsr layout"), "Hsr Layout");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_buckets_empty() {
        let mut buckets = LookupBuckets::default();
        assert!(buckets.is_empty());

        buckets.weather = Some(WeatherReading {
            temp_c: 24.0,
            condition: "Partly cloudy".into(),
        });
        assert!(!buckets.is_empty());
    }
}
