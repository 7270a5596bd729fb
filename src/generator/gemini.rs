use super::RecipeGenerator;
use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

pub struct GeminiGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GeminiGenerator {
    /// Create a new Google Gemini generator from configuration
    pub fn new(config: &GeneratorConfig) -> Result<Self, GenerateError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or(GenerateError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(GeminiGenerator {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

/// Map a failed response onto the user-facing error kinds.
fn classify_failure(status: StatusCode, body: &str) -> GenerateError {
    let lower = body.to_lowercase();
    if lower.contains("api_key") || lower.contains("api key") {
        GenerateError::InvalidApiKey
    } else if status == StatusCode::TOO_MANY_REQUESTS || lower.contains("quota") {
        GenerateError::QuotaExceeded
    } else if lower.contains("safety") {
        GenerateError::Safety
    } else {
        GenerateError::Provider(format!("Gemini API error ({}): {}", status, body))
    }
}

#[async_trait]
impl RecipeGenerator for GeminiGenerator {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&json!({
                "contents": [{
                    "parts": [{ "text": prompt }]
                }],
                "generationConfig": {
                    "temperature": self.temperature,
                    "maxOutputTokens": self.max_tokens
                }
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(classify_failure(status, &body));
        }

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);

        let candidate = &response_body["candidates"][0];
        if candidate["finishReason"].as_str() == Some("SAFETY")
            || response_body["promptFeedback"]["blockReason"].is_string()
        {
            return Err(GenerateError::Safety);
        }

        let text = candidate["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                GenerateError::Provider(
                    "Failed to extract content from Google Gemini response".to_string(),
                )
            })?
            .to_string();

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> GeneratorConfig {
        GeneratorConfig {
            api_key: Some("test-key".to_string()),
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_provider_name() {
        let generator = GeminiGenerator::new(&test_config()).unwrap();
        assert_eq!(generator.provider_name(), "google");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = GeneratorConfig {
            base_url: "http://localhost:1234/".to_string(),
            ..test_config()
        };
        let generator = GeminiGenerator::new(&config).unwrap();
        assert_eq!(generator.base_url, "http://localhost:1234");
    }

    #[test]
    fn test_classify_failure() {
        assert!(matches!(
            classify_failure(StatusCode::BAD_REQUEST, "API key not valid. API_KEY_INVALID"),
            GenerateError::InvalidApiKey
        ));
        assert!(matches!(
            classify_failure(StatusCode::TOO_MANY_REQUESTS, "slow down"),
            GenerateError::QuotaExceeded
        ));
        assert!(matches!(
            classify_failure(StatusCode::BAD_REQUEST, "blocked by safety settings"),
            GenerateError::Safety
        ));
        assert!(matches!(
            classify_failure(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            GenerateError::Provider(_)
        ));
    }
}
