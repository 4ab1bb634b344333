//! Google Gemini provider.
//!
//! Uses the `generateContent` REST endpoint:
//! `POST {endpoint}/v1beta/models/{model}:generateContent`

use crate::client::{GenerationProvider, GenerationRequest};
use crate::error::{ProviderError, ProviderErrorKind};
use crate::types::ProviderType;
use fundqa_core::{AppError, AppResult};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
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

/// Gemini client.
pub struct GeminiClient {
    client: reqwest::Client,
    model: String,
    url: String,
}

impl GeminiClient {
    /// Create a client for `model`, authenticating with `api_key`.
    pub fn new(
        api_key: &str,
        model: impl Into<String>,
        endpoint: Option<&str>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let model = model.into();
        let base = endpoint
            .unwrap_or(ProviderType::Gemini.default_endpoint())
            .trim_end_matches('/');

        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(api_key)
                .map_err(|e| AppError::Config(format!("Invalid Gemini API key header: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let url = format!("{}/v1beta/models/{}:generateContent", base, model);
        tracing::debug!("Gemini client configured for {}", url);

        Ok(Self {
            client: super::http_client(timeout, headers)?,
            model,
            url,
        })
    }

    fn build_body<'a>(&self, request: &'a GenerationRequest) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        }
    }

    fn error(kind: ProviderErrorKind, message: impl Into<String>) -> ProviderError {
        ProviderError::new(ProviderType::Gemini.display_name(), kind, message)
    }
}

#[async_trait::async_trait]
impl GenerationProvider for GeminiClient {
    fn provider_name(&self) -> &str {
        ProviderType::Gemini.as_str()
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let started = Instant::now();
        tracing::debug!(
            model = %self.model,
            prompt_len = request.prompt.len(),
            "POST generateContent"
        );

        let response = self
            .client
            .post(&self.url)
            .json(&self.build_body(request))
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(ProviderType::Gemini.display_name(), &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ProviderError::from_status(
                ProviderType::Gemini.display_name(),
                status.as_u16(),
                &body,
            );
            tracing::warn!(%status, kind = ?err.kind, "Gemini returned non-success status");
            return Err(err);
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            Self::error(
                ProviderErrorKind::Other,
                format!("failed to decode response: {}", e),
            )
        })?;

        let text = extract_text(parsed)
            .ok_or_else(|| Self::error(ProviderErrorKind::Other, "response contained no text"))?;

        tracing::info!(
            model = %self.model,
            latency_ms = started.elapsed().as_millis() as u64,
            "Gemini completion received"
        );

        Ok(text)
    }
}

fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let candidate = response.candidates.into_iter().next()?;
    let text: String = candidate
        .content?
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::new("test-key", "gemini-1.5-flash", None, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_url_construction() {
        let c = client();
        assert_eq!(
            c.url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert_eq!(c.model_name(), "gemini-1.5-flash");
        assert_eq!(c.provider_name(), "gemini");
    }

    #[test]
    fn test_custom_endpoint_trailing_slash() {
        let c = GeminiClient::new("k", "m", Some("http://localhost:8080/"), Duration::from_secs(1))
            .unwrap();
        assert_eq!(c.url, "http://localhost:8080/v1beta/models/m:generateContent");
    }

    #[test]
    fn test_request_body() {
        let c = client();
        let request = GenerationRequest::new("prompt text")
            .with_temperature(0.1)
            .with_max_tokens(1000);
        let body = serde_json::to_value(c.build_body(&request)).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "prompt text");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1000);
        assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let parsed: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "1.05%" }, { "text": " [Source 1]" }] } }]
        }))
        .unwrap();
        assert_eq!(extract_text(parsed).as_deref(), Some("1.05% [Source 1]"));
    }

    #[test]
    fn test_extract_text_empty() {
        let parsed: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({ "candidates": [] })).unwrap();
        assert!(extract_text(parsed).is_none());
    }

    #[test]
    fn test_invalid_key_header_is_config_error() {
        let result = GeminiClient::new("bad\nkey", "m", None, Duration::from_secs(1));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_provider_error() {
        let c = GeminiClient::new("k", "m", Some("http://127.0.0.1:1"), Duration::from_secs(2))
            .unwrap();
        let err = c.generate(&GenerationRequest::new("hi")).await.unwrap_err();
        assert_eq!(err.provider, "Gemini");
        assert!(err.to_string().starts_with("Gemini API error:"));
    }
}
