//! Answer response types.

use crate::types::ScoredChunk;
use chrono::Utc;
use serde::Serialize;

/// Fixed answer when retrieval finds nothing.
pub const NO_INFO_ANSWER: &str = "I don't have enough information to answer this question. Please try rephrasing or ask about a different topic.";

/// Context text used when retrieval finds nothing.
pub const NO_CONTEXT: &str = "No relevant information found.";

/// Where part of an answer came from. Missing metadata is filled with defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRef {
    pub url: String,
    pub scheme: String,
    pub description: String,
    pub relevance_score: f32,
}

impl SourceRef {
    pub fn from_scored(scored: &ScoredChunk) -> Self {
        let meta = &scored.chunk.metadata;
        Self {
            url: meta.source.clone().unwrap_or_else(|| "Unknown".to_string()),
            scheme: meta.scheme.clone().unwrap_or_else(|| "General".to_string()),
            description: meta.description.clone().unwrap_or_default(),
            relevance_score: scored.score,
        }
    }
}

/// How a question was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalState {
    NoInfo,
    Answered,
    Error,
    Greeting,
    Advice,
}

impl TerminalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoInfo => "no_info",
            Self::Answered => "answered",
            Self::Error => "error",
            Self::Greeting => "greeting",
            Self::Advice => "advice",
        }
    }
}

/// The single response shape for every question.
///
/// Fields are private so `retrieved_docs` always equals the number of
/// sources; build one through the state constructors.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    question: String,
    answer: String,
    sources: Vec<SourceRef>,
    timestamp: String,
    retrieved_docs: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_greeting: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_advice_refusal: Option<bool>,
    #[serde(skip)]
    state: TerminalState,
}

impl AnswerResponse {
    fn build(
        state: TerminalState,
        question: &str,
        answer: String,
        sources: Vec<SourceRef>,
        error: Option<String>,
    ) -> Self {
        Self {
            question: question.to_string(),
            answer,
            retrieved_docs: sources.len(),
            sources,
            timestamp: Utc::now().to_rfc3339(),
            error,
            is_greeting: (state == TerminalState::Greeting).then_some(true),
            is_advice_refusal: (state == TerminalState::Advice).then_some(true),
            state,
        }
    }

    pub fn answered(question: &str, answer: impl Into<String>, sources: Vec<SourceRef>) -> Self {
        Self::build(TerminalState::Answered, question, answer.into(), sources, None)
    }

    pub fn no_info(question: &str) -> Self {
        Self::build(
            TerminalState::NoInfo,
            question,
            NO_INFO_ANSWER.to_string(),
            Vec::new(),
            None,
        )
    }

    /// Failure response. Sources already retrieved stay attached.
    pub fn error(
        question: &str,
        answer: impl Into<String>,
        error: impl Into<String>,
        sources: Vec<SourceRef>,
    ) -> Self {
        Self::build(
            TerminalState::Error,
            question,
            answer.into(),
            sources,
            Some(error.into()),
        )
    }

    pub fn greeting(question: &str, answer: impl Into<String>) -> Self {
        Self::build(TerminalState::Greeting, question, answer.into(), Vec::new(), None)
    }

    pub fn advice_refusal(question: &str, answer: impl Into<String>) -> Self {
        Self::build(TerminalState::Advice, question, answer.into(), Vec::new(), None)
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn sources(&self) -> &[SourceRef] {
        &self.sources
    }

    /// RFC 3339 construction time.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn retrieved_docs(&self) -> usize {
        self.retrieved_docs
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_greeting(&self) -> bool {
        self.is_greeting.unwrap_or(false)
    }

    pub fn is_advice_refusal(&self) -> bool {
        self.is_advice_refusal.unwrap_or(false)
    }

    pub fn state(&self) -> TerminalState {
        self.state
    }
}
