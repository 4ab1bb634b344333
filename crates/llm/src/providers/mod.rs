//! Backend implementations.

pub mod gemini;
pub mod grok;

pub use gemini::GeminiClient;
pub use grok::GrokClient;

use fundqa_core::{AppError, AppResult};
use std::time::Duration;

/// Build the shared HTTP client for a backend.
pub(crate) fn http_client(
    timeout: Duration,
    headers: reqwest::header::HeaderMap,
) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))
}
