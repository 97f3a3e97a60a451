//! Configuration for CityPulse
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use uuid::Uuid;

/// CityPulse - neighborhood vibe aggregation gateway
#[derive(Parser, Debug, Clone)]
#[command(name = "citypulse")]
#[command(about = "Aggregates news, search context, places, and weather into a neighborhood pulse")]
pub struct Args {
    /// Unique node identifier for this gateway instance
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Enable development mode (in-memory history fallback, relaxed config checks)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "citypulse")]
    pub mongodb_db: String,

    /// City qualifier appended to every lookup query
    #[arg(long, env = "CITY", default_value = "Bangalore")]
    pub city: String,

    /// Country qualifier for weather lookups
    #[arg(long, env = "COUNTRY", default_value = "India")]
    pub country: String,

    /// NewsAPI key for the news adapter
    #[arg(long, env = "NEWS_API_KEY")]
    pub news_api_key: Option<String>,

    /// SerpApi key for the web-context and places adapters
    #[arg(long, env = "SERPAPI_API_KEY")]
    pub serpapi_api_key: Option<String>,

    /// WeatherAPI key for the weather adapter
    #[arg(long, env = "WEATHER_API_KEY")]
    pub weather_api_key: Option<String>,

    /// Gemini API key for the vibe summarizer
    #[arg(long, env = "GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,

    /// Gemini model used for summarization
    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-1.5-flash")]
    pub gemini_model: String,

    /// Identity provider domain (e.g. "example.auth0.com")
    #[arg(long, env = "AUTH_DOMAIN")]
    pub auth_domain: Option<String>,

    /// OAuth client ID registered with the identity provider
    #[arg(long, env = "AUTH_CLIENT_ID")]
    pub auth_client_id: Option<String>,

    /// OAuth client secret for the code exchange
    #[arg(long, env = "AUTH_CLIENT_SECRET")]
    pub auth_client_secret: Option<String>,

    /// Redirect URI the provider sends the authorization code to
    #[arg(long, env = "AUTH_REDIRECT_URI", default_value = "http://localhost:8080/auth/callback")]
    pub auth_redirect_uri: String,

    /// Request timeout for outbound HTTP calls in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "30000")]
    pub request_timeout_ms: u64,
}

impl Args {
    /// Outbound HTTP request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.dev_mode {
            if self.news_api_key.is_none() {
                return Err("NEWS_API_KEY is required in production mode".to_string());
            }
            if self.serpapi_api_key.is_none() {
                return Err("SERPAPI_API_KEY is required in production mode".to_string());
            }
            if self.weather_api_key.is_none() {
                return Err("WEATHER_API_KEY is required in production mode".to_string());
            }
            if self.gemini_api_key.is_none() {
                return Err("GEMINI_API_KEY is required in production mode".to_string());
            }
            if self.auth_domain.is_none()
                || self.auth_client_id.is_none()
                || self.auth_client_secret.is_none()
            {
                return Err(
                    "AUTH_DOMAIN, AUTH_CLIENT_ID and AUTH_CLIENT_SECRET are required in production mode"
                        .to_string(),
                );
            }
        }

        if self.city.trim().is_empty() {
            return Err("CITY must not be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args::parse_from(["citypulse", "--dev-mode"])
    }

    #[test]
    fn test_dev_mode_allows_missing_keys() {
        let args = base_args();
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_production_requires_keys() {
        let args = Args::parse_from(["citypulse"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_empty_city_rejected() {
        let mut args = base_args();
        args.city = "  ".to_string();
        assert!(args.validate().is_err());
    }
}
