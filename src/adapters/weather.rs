//! Weather adapter backed by WeatherAPI
//!
//! Fetches current conditions for `"{area},{country}"`. Any non-2xx response
//! or parse failure yields no reading.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::adapters::{AdapterError, WeatherSource};
use crate::pulse::types::{AreaQuery, WeatherReading};

const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com/v1";

/// WeatherAPI client
#[derive(Clone)]
pub struct WeatherApiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl WeatherApiClient {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl WeatherSource for WeatherApiClient {
    async fn current_weather(&self, query: &AreaQuery) -> Result<WeatherReading, AdapterError> {
        let location = query.weather_location();
        debug!(location = %location, "Fetching current weather");

        let response = self
            .http
            .get(format!("{}/current.json", self.base_url))
            .query(&[("key", self.api_key.as_str()), ("q", location.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AdapterError::Status(response.status().as_u16()));
        }

        let body: WeatherResponse = response
            .json()
            .await
            .map_err(|e| AdapterError::InvalidResponse(e.to_string()))?;

        Ok(WeatherReading {
            temp_c: body.current.temp_c,
            condition: body.current.condition.text,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temp_c: f64,
    condition: ConditionText,
}

#[derive(Debug, Deserialize)]
struct ConditionText {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_current_weather() {
        let body: WeatherResponse = serde_json::from_str(
            r#"{
                "location": {"name": "Koramangala"},
                "current": {
                    "temp_c": 24.0,
                    "condition": {"text": "Partly cloudy", "code": 1003}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(body.current.temp_c, 24.0);
        assert_eq!(body.current.condition.text, "Partly cloudy");
    }

    #[test]
    fn test_missing_current_is_an_error() {
        let parsed: Result<WeatherResponse, _> = serde_json::from_str(r#"{"location": {}}"#);
        assert!(parsed.is_err());
    }
}
