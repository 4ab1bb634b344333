//! Entry point for answering user questions.

use crate::guardrail::{self, Classification};
use crate::rag::answer::AnswerGenerator;
use crate::rag::types::AnswerResponse;
use futures::stream::{self, StreamExt};

/// Per-question overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct AskOptions {
    /// Number of chunks to retrieve
    pub k: Option<usize>,

    /// Sampling temperature
    pub temperature: Option<f32>,
}

/// Classifies each question first; only factual ones reach retrieval.
pub struct Assistant {
    generator: AnswerGenerator,
}

impl Assistant {
    pub fn new(generator: AnswerGenerator) -> Self {
        Self { generator }
    }

    pub async fn ask(&self, question: &str) -> AnswerResponse {
        self.ask_with(question, AskOptions::default()).await
    }

    pub async fn ask_with(&self, question: &str, options: AskOptions) -> AnswerResponse {
        match guardrail::classify(question) {
            Classification::Greeting => guardrail::greeting_response(question),
            Classification::Advice => {
                tracing::info!("Refusing advice request");
                guardrail::refusal_response(question)
            }
            Classification::Factual => {
                self.generator
                    .generate_answer(question, options.k, options.temperature)
                    .await
            }
        }
    }

    /// `ask` for each question, in input order.
    pub async fn ask_all(&self, questions: &[String]) -> Vec<AnswerResponse> {
        stream::iter(questions)
            .then(|q| self.ask(q))
            .collect()
            .await
    }
}
