//! xAI Grok provider (OpenAI-compatible chat completions).
//!
//! `POST {endpoint}/v1/chat/completions` with bearer authentication.

use crate::client::{GenerationProvider, GenerationRequest};
use crate::error::{ProviderError, ProviderErrorKind};
use crate::types::ProviderType;
use fundqa_core::{AppError, AppResult};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Grok client.
pub struct GrokClient {
    client: reqwest::Client,
    model: String,
    url: String,
}

impl GrokClient {
    pub fn new(
        api_key: &str,
        model: impl Into<String>,
        endpoint: Option<&str>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let model = model.into();
        let base = endpoint
            .unwrap_or(ProviderType::Grok.default_endpoint())
            .trim_end_matches('/');

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| AppError::Config(format!("Invalid Grok API key header: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let url = format!("{}/v1/chat/completions", base);
        tracing::debug!("Grok client configured for {}", url);

        Ok(Self {
            client: super::http_client(timeout, headers)?,
            model,
            url,
        })
    }

    fn build_body<'a>(&'a self, request: &'a GenerationRequest) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait::async_trait]
impl GenerationProvider for GrokClient {
    fn provider_name(&self) -> &str {
        ProviderType::Grok.as_str()
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let started = Instant::now();
        let name = ProviderType::Grok.display_name();
        tracing::debug!(model = %self.model, prompt_len = request.prompt.len(), "POST {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .json(&self.build_body(request))
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(name, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ProviderError::from_status(name, status.as_u16(), &body);
            tracing::warn!(%status, kind = ?err.kind, "Grok returned non-success status");
            return Err(err);
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            ProviderError::new(
                name,
                ProviderErrorKind::Other,
                format!("failed to decode response: {}", e),
            )
        })?;

        let content = extract_content(parsed).ok_or_else(|| ProviderError::new(name, ProviderErrorKind::Other, "no choices returned"))?;

        tracing::info!(
            model = %self.model,
            latency_ms = started.elapsed().as_millis() as u64,
            "Grok completion received"
        );

        Ok(content)
    }
}

/// First choice that carries message content.
fn extract_content(response: ChatCompletionResponse) -> Option<String> {
    response.choices.into_iter().find_map(|c| c.message.content)
}
