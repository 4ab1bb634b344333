//! Classified failures from generation backends.
//!
//! Every backend failure becomes a [`ProviderError`] carrying a
//! [`ProviderErrorKind`], so the answer pipeline can attach a remediation
//! hint without knowing which backend produced it.

use fundqa_core::AppError;
use thiserror::Error;

/// Longest response-body excerpt kept in an error message.
const SNIPPET_LIMIT: usize = 300;

/// Failure categories shared by all backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    QuotaExceeded,
    RateLimited,
    AuthInvalid,
    ModelNotFound,
    Timeout,
    Other,
}

impl ProviderErrorKind {
    /// Classify a failure from an optional HTTP status and the error text.
    ///
    /// First match wins: quota, rate limit, missing model, bad credentials.
    pub fn classify(status: Option<u16>, text: &str) -> Self {
        let lower = text.to_lowercase();

        if status == Some(429) || lower.contains("429") || lower.contains("quota") {
            Self::QuotaExceeded
        } else if lower.contains("rate limit") {
            Self::RateLimited
        } else if status == Some(404) || lower.contains("404") || lower.contains("not found") {
            Self::ModelNotFound
        } else if matches!(status, Some(401) | Some(403))
            || lower.contains("401")
            || lower.contains("invalid api key")
            || lower.contains("api_key_invalid")
            || lower.contains("api key not valid")
        {
            Self::AuthInvalid
        } else {
            Self::Other
        }
    }

    /// Short label used in user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::QuotaExceeded => "API quota exceeded",
            Self::RateLimited => "rate limited",
            Self::AuthInvalid => "invalid API key",
            Self::ModelNotFound => "model not found",
            Self::Timeout => "request timed out",
            Self::Other => "request failed",
        }
    }

    /// What the user can do about it.
    pub fn remediation(&self) -> &'static str {
        match self {
            Self::QuotaExceeded => {
                "Wait for the quota to reset, upgrade your API plan, or use a different API key."
            }
            Self::RateLimited => "Wait 30-60 seconds before asking again.",
            Self::AuthInvalid => {
                "Check that the API key environment variable is set to a valid key."
            }
            Self::ModelNotFound => "Configure a model name the provider supports.",
            Self::Timeout => "The provider did not answer in time. Try again shortly.",
            Self::Other => "Try again later or check the provider status.",
        }
    }
}

/// A failure reported by a generation backend.
#[derive(Debug, Clone, Error)]
#[error("{provider} API error: {message}")]
pub struct ProviderError {
    /// Display name of the backend (e.g., "Gemini")
    pub provider: String,
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(provider: impl Into<String>, kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            kind,
            message: message.into(),
        }
    }

    /// Build from an HTTP status and response body, classifying the pair.
    pub fn from_status(provider: impl Into<String>, status: u16, body: &str) -> Self {
        let kind = ProviderErrorKind::classify(Some(status), body);
        Self::new(provider, kind, format!("HTTP {}: {}", status, make_snippet(body)))
    }

    /// Build from a transport-level failure.
    pub fn from_transport(provider: impl Into<String>, err: &reqwest::Error) -> Self {
        let text = err.to_string();
        let kind = if err.is_timeout() {
            ProviderErrorKind::Timeout
        } else {
            ProviderErrorKind::classify(err.status().map(|s| s.as_u16()), &text)
        };
        Self::new(provider, kind, text)
    }

    /// The call was abandoned after `elapsed`.
    pub fn timeout(provider: impl Into<String>, elapsed: std::time::Duration) -> Self {
        Self::new(
            provider,
            ProviderErrorKind::Timeout,
            format!("no response after {:?}", elapsed),
        )
    }

    /// Hint for the user based on the failure kind.
    pub fn remediation(&self) -> &'static str {
        self.kind.remediation()
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::Llm(err.to_string())
    }
}

/// Trim a response body to a single-line excerpt.
pub fn make_snippet(body: &str) -> String {
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= SNIPPET_LIMIT {
        flat
    } else {
        let cut: String = flat.chars().take(SNIPPET_LIMIT).collect();
        format!("{}...", cut)
    }
}
