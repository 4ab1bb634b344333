//! Retrieval-augmented answering over the fund document index.

pub mod answer;
pub mod assistant;
pub mod retriever;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use answer::{format_response, AnswerGenerator};
pub use assistant::{AskOptions, Assistant};
pub use retriever::{format_context, Retriever};
pub use types::{AnswerResponse, SourceRef, TerminalState, NO_INFO_ANSWER};
