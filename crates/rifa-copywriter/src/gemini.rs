//! Gemini `generateContent` backend

use crate::{CopyError, DescriptionGenerator, DescriptionRequest, SYSTEM_INSTRUCTION};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::instrument;

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default API base URL
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    /// API key; generation reports `MissingApiKey` without one
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// API base URL
    pub endpoint: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl GeminiConfig {
    /// Set API key, ignoring blank values
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = (!key.trim().is_empty()).then_some(key);
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

/// Description generator calling the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiGenerator {
    /// Build the HTTP client
    ///
    /// # Errors
    /// `CopyError::Http` if the client cannot be constructed.
    pub fn new(config: GeminiConfig) -> Result<Self, CopyError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Active settings
    #[must_use]
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl DescriptionGenerator for GeminiGenerator {
    #[instrument(skip_all, fields(model = %self.config.model))]
    async fn generate(&self, request: &DescriptionRequest) -> Result<String, CopyError> {
        let api_key = self.config.api_key.as_deref().ok_or(CopyError::MissingApiKey)?;

        let prompt = request.prompt();
        let body = GenerateRequest::new(SYSTEM_INSTRUCTION, &prompt);
        let response = self
            .client
            .post(self.config.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CopyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed.text().ok_or(CopyError::EmptyResponse)?;
        tracing::debug!(chars = text.len(), "description generated");
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

impl<'a> GenerateRequest<'a> {
    fn new(system: &'a str, prompt: &'a str) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: system }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, `None` when blank
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_joins_endpoint_and_model() {
        let config = GeminiConfig {
            endpoint: "http://localhost:9/v1/".to_string(),
            ..GeminiConfig::default()
        };
        assert_eq!(
            config.url(),
            "http://localhost:9/v1/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn blank_api_key_is_ignored() {
        assert_eq!(GeminiConfig::default().with_api_key("  ").api_key, None);
        assert_eq!(
            GeminiConfig::default().with_api_key("k").api_key.as_deref(),
            Some("k")
        );
    }

    #[test]
    fn request_body_layout() {
        let body = serde_json::to_value(GenerateRequest::new("sys", "hello")).unwrap();
        assert_eq!(
            body,
            json!({
                "systemInstruction": { "parts": [{ "text": "sys" }] },
                "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }]
            })
        );
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "¡Gana " }, { "text": "hoy!" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("¡Gana hoy!"));
    }

    #[test]
    fn blocked_response_has_no_text() {
        let response: GenerateResponse =
            serde_json::from_value(json!({ "candidates": [{ "finishReason": "SAFETY" }] })).unwrap();
        assert_eq!(response.text(), None);
        assert_eq!(GenerateResponse::default().text(), None);
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let generator = GeminiGenerator::new(GeminiConfig::default()).unwrap();
        let request = DescriptionRequest::new("t", 1.0, Vec::new());
        let err = generator.generate(&request).await.unwrap_err();
        assert!(err.is_unconfigured());
    }
}
