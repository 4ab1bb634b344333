//! Error types for fundqa.
//!
//! A single error enum covers configuration, I/O, generation backends,
//! the knowledge index, retrieval, and prompt rendering.

use thiserror::Error;

/// Unified error type for fundqa.
///
/// Fallible functions return `AppResult<T>`; nothing outside tests panics.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing credentials, unknown provider, invalid settings. Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Text-generation backend errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Knowledge index and ingestion errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Index query failures and timeouts while answering a question
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
