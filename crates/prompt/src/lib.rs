//! Prompt assembly for fundqa.
//!
//! This crate turns a question, its retrieved context, and the matching
//! source list into the single prompt sent to the generation backend:
//! - Built-in answer template (Handlebars, no HTML escaping)
//! - Optional YAML prompt definitions replacing the template
//! - Deterministic rendering for a given date

pub mod builder;
pub mod loader;
pub mod types;

pub use builder::PromptBuilder;
pub use loader::load_prompt_file;
pub use types::{PromptDefinition, PromptSource, BUILTIN_PROMPT_ID};
