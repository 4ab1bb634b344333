//! Text-generation backends for fundqa.
//!
//! A single [`GenerationProvider`] trait hides which hosted model answers a
//! prompt. Implementations are picked from configuration by
//! [`create_provider`].
//!
//! # Providers
//! - **Gemini**: Google Generative Language API (default)
//! - **Grok**: xAI, OpenAI-compatible chat completions
//!
//! # Example
//! ```no_run
//! use fundqa_llm::{create_provider, GenerationRequest, ProviderSettings};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = ProviderSettings::new("gemini", "gemini-1.5-flash")
//!     .with_api_key("AIza...")
//!     .with_timeout(Duration::from_secs(30));
//! let provider = create_provider(&settings)?;
//! let answer = provider
//!     .generate(&GenerationRequest::new("What is an exit load?").with_temperature(0.1))
//!     .await?;
//! println!("{}", answer);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod factory;
pub mod providers;
pub mod types;

pub use client::{GenerationProvider, GenerationRequest};
pub use error::{ProviderError, ProviderErrorKind};
pub use factory::{create_provider, ProviderSettings};
pub use providers::{GeminiClient, GrokClient};
pub use types::ProviderType;
