//! Gemini generateContent client
//!
//! Production `TextGenerator` backed by the Google Generative Language REST
//! API: one prompt in, one candidate text out.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::vibe::{GeneratorError, TextGenerator};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini REST client
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, api_key: String, model: String) -> Self {
        Self {
            http,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "Calling generateContent");

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let payload = json!({
            "contents": [
                {
                    "parts": [
                        {"text": prompt}
                    ]
                }
            ]
        });

        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| GeneratorError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeneratorError::Status(response.status().as_u16()));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::InvalidResponse(e.to_string()))?;

        extract_text(body)
            .ok_or_else(|| GeneratorError::InvalidResponse("response missing text content".into()))
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Pull the first candidate's first text part
fn extract_text(body: GenerateResponse) -> Option<String> {
    body.candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .find_map(|part| part.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text() {
        let body: GenerateResponse = serde_json::from_str(
            r###"{
                "candidates": [
                    {
                        "content": {
                            "parts": [{"text": "## Vibe Summary\nCalm and leafy."}],
                            "role": "model"
                        },
                        "finishReason": "STOP"
                    }
                ]
            }"###,
        )
        .unwrap();

        assert_eq!(
            extract_text(body).as_deref(),
            Some("## Vibe Summary\nCalm and leafy.")
        );
    }

    #[test]
    fn test_extract_text_missing_candidates() {
        let body: GenerateResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(extract_text(body).is_none());
    }

    #[test]
    fn test_extract_text_empty_parts() {
        let body: GenerateResponse =
            serde_json::from_str(r#"{"candidates": [{"content": {"parts": []}}]}"#).unwrap();
        assert!(extract_text(body).is_none());
    }
}
