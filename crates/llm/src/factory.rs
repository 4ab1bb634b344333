//! Generation provider factory.
//!
//! Resolves the configured backend into a ready client. Every problem
//! found here is a configuration error, raised before any question is
//! processed.

use crate::client::GenerationProvider;
use crate::providers::{GeminiClient, GrokClient};
use crate::types::ProviderType;
use fundqa_core::{is_placeholder_credential, AppConfig, AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Everything needed to construct a backend client.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub provider: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Name of the variable the key was expected in, for error messages
    pub api_key_env: Option<String>,
    pub endpoint: Option<String>,
    pub timeout: Duration,
}

impl ProviderSettings {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            api_key: None,
            api_key_env: None,
            endpoint: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Settings for the active provider in `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            provider: config.provider.clone(),
            model: config.effective_model().unwrap_or_default(),
            api_key: config.resolve_api_key(&config.provider),
            api_key_env: Some(config.api_key_env(&config.provider)),
            endpoint: config.endpoint(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn credential(&self) -> AppResult<&str> {
        let env_hint = self
            .api_key_env
            .as_deref()
            .map(|v| format!(" (set {})", v))
            .unwrap_or_default();

        match self.api_key.as_deref() {
            Some(key) if !is_placeholder_credential(key) => Ok(key),
            Some(_) => Err(AppError::Config(format!(
                "{} API key is a placeholder{}",
                self.provider, env_hint
            ))),
            None => Err(AppError::Config(format!(
                "{} provider requires an API key{}",
                self.provider, env_hint
            ))),
        }
    }
}

/// Create a generation provider from settings.
///
/// # Errors
/// `AppError::Config` when the provider is unknown, the model is empty, or
/// the credential is missing or a placeholder.
pub fn create_provider(settings: &ProviderSettings) -> AppResult<Arc<dyn GenerationProvider>> {
    let provider_type = ProviderType::parse(&settings.provider).ok_or_else(|| {
        AppError::Config(format!(
            "Unknown provider: {}. Supported: gemini, grok",
            settings.provider
        ))
    })?;

    if settings.model.trim().is_empty() {
        return Err(AppError::Config(format!(
            "No model configured for provider '{}'",
            provider_type.as_str()
        )));
    }

    let api_key = settings.credential()?;
    let endpoint = settings.endpoint.as_deref();

    tracing::info!(
        provider = provider_type.as_str(),
        model = %settings.model,
        timeout_secs = settings.timeout.as_secs(),
        "Creating generation provider"
    );

    match provider_type {
        ProviderType::Gemini => Ok(Arc::new(GeminiClient::new(
            api_key,
            settings.model.clone(),
            endpoint,
            settings.timeout,
        )?)),
        ProviderType::Grok => Ok(Arc::new(GrokClient::new(
            api_key,
            settings.model.clone(),
            endpoint,
            settings.timeout,
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_config_err(settings: &ProviderSettings, needle: &str) {
        match create_provider(settings) {
            Err(AppError::Config(msg)) => assert!(msg.contains(needle), "message was: {}", msg),
            Err(other) => panic!("Expected config error, got {}", other),
            Ok(_) => panic!("Expected config error"),
        }
    }

    #[test]
    fn test_create_gemini() {
        let settings = ProviderSettings::new("gemini", "gemini-1.5-flash").with_api_key("real");
        let provider = create_provider(&settings).unwrap();
        assert_eq!(provider.provider_name(), "gemini");
        assert_eq!(provider.model_name(), "gemini-1.5-flash");
    }

    #[test]
    fn test_create_grok_with_endpoint() {
        let settings = ProviderSettings::new("grok", "grok-beta")
            .with_api_key("real")
            .with_endpoint("http://localhost:8080");
        let provider = create_provider(&settings).unwrap();
        assert_eq!(provider.provider_name(), "grok");
    }

    #[test]
    fn test_missing_key() {
        expect_config_err(&ProviderSettings::new("gemini", "m"), "requires an API key");
    }

    #[test]
    fn test_placeholder_key() {
        let settings = ProviderSettings::new("grok", "grok-beta").with_api_key("your_grok_api_key_here");
        expect_config_err(&settings, "placeholder");
    }

    #[test]
    fn test_unknown_provider() {
        let settings = ProviderSettings::new("ollama", "llama3").with_api_key("real");
        expect_config_err(&settings, "Unknown provider");
    }

    #[test]
    fn test_empty_model() {
        let settings = ProviderSettings::new("gemini", "  ").with_api_key("real");
        expect_config_err(&settings, "No model configured");
    }

    #[test]
    fn test_from_config() {
        let config = AppConfig {
            provider: "grok".to_string(),
            api_key: Some("real".to_string()),
            timeout_secs: 12,
            ..AppConfig::default()
        };
        let settings = ProviderSettings::from_config(&config);
        assert_eq!(settings.model, "grok-beta");
        assert_eq!(settings.api_key.as_deref(), Some("real"));
        assert_eq!(settings.api_key_env.as_deref(), Some("GROK_API_KEY"));
        assert_eq!(settings.timeout, Duration::from_secs(12));
    }
}
