//! fundqa core library
//!
//! Foundational utilities shared by every fundqa crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management

pub mod config;
pub mod error;
pub mod logging;

pub use config::{is_placeholder_credential, AppConfig};
pub use error::{AppError, AppResult};
