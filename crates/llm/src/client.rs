//! Generation provider abstraction and request type.

use crate::error::ProviderError;
use serde::{Deserialize, Serialize};

/// A single prompt to complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The full prompt text
    pub prompt: String,

    /// Sampling temperature (0.0 - 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A hosted text-generation backend.
///
/// Failures are reported as classified [`ProviderError`]s so callers can turn
/// them into user-facing messages without inspecting transport details.
#[async_trait::async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Provider identifier (e.g., "gemini", "grok").
    fn provider_name(&self) -> &str;

    /// Model the provider sends requests to.
    fn model_name(&self) -> &str;

    /// Complete the prompt and return the generated text verbatim.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError>;
}
