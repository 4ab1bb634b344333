//! Grounded answer generation: retrieve, prompt, generate.

use crate::rag::retriever::{format_context, Retriever};
use crate::rag::types::{AnswerResponse, SourceRef};
use fundqa_llm::{GenerationProvider, GenerationRequest, ProviderError};
use fundqa_prompt::{PromptBuilder, PromptSource};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

/// Turns a factual question into an `AnswerResponse`.
///
/// Never fails: retrieval and provider faults become ERROR responses.
pub struct AnswerGenerator {
    retriever: Retriever,
    provider: Arc<dyn GenerationProvider>,
    prompt_builder: Arc<PromptBuilder>,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl AnswerGenerator {
    pub fn new(
        retriever: Retriever,
        provider: Arc<dyn GenerationProvider>,
        prompt_builder: Arc<PromptBuilder>,
    ) -> Self {
        Self {
            retriever,
            provider,
            prompt_builder,
            temperature: 0.1,
            max_tokens: 1000,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Answer one question. `k` and `temperature` override the defaults
    /// when given.
    pub async fn generate_answer(
        &self,
        question: &str,
        k: Option<usize>,
        temperature: Option<f32>,
    ) -> AnswerResponse {
        let span = tracing::info_span!("answer", question = %question);
        async {
            let response = self.run(question, k, temperature).await;
            tracing::info!(
                state = response.state().as_str(),
                retrieved_docs = response.retrieved_docs(),
                "Answer finished"
            );
            response
        }
        .instrument(span)
        .await
    }

    async fn run(&self, question: &str, k: Option<usize>, temperature: Option<f32>) -> AnswerResponse {
        let results = match self.retriever.retrieve(question, k).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("Retrieval failed: {}", e);
                return AnswerResponse::error(
                    question,
                    format!("Error retrieving information: {}. Please try again later.", e),
                    e.to_string(),
                    Vec::new(),
                );
            }
        };

        let (context, sources) = format_context(&results);
        if sources.is_empty() {
            return AnswerResponse::no_info(question);
        }

        let prompt_sources = to_prompt_sources(&sources);
        let prompt = match self
            .prompt_builder
            .create_prompt(question, &context, &prompt_sources)
        {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!("Prompt rendering failed: {}", e);
                return AnswerResponse::error(
                    question,
                    format!("Error generating answer: {}", e),
                    e.to_string(),
                    sources,
                );
            }
        };

        let request = GenerationRequest::new(prompt)
            .with_temperature(temperature.unwrap_or(self.temperature))
            .with_max_tokens(self.max_tokens);

        match self.call_provider(&request).await {
            Ok(answer) => AnswerResponse::answered(question, answer, sources),
            Err(e) => {
                tracing::warn!("Generation failed ({:?}): {}", e.kind, e);
                AnswerResponse::error(
                    question,
                    format!("Error generating answer: {}. {}", e, e.remediation()),
                    e.to_string(),
                    sources,
                )
            }
        }
    }

    async fn call_provider(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        match tokio::time::timeout(self.timeout, self.provider.generate(request)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::timeout(
                self.provider.provider_name(),
                self.timeout,
            )),
        }
    }

    /// Answer each question in turn, in input order.
    pub async fn answer_questions(&self, questions: &[String]) -> Vec<AnswerResponse> {
        stream::iter(questions)
            .then(|q| self.generate_answer(q, None, None))
            .collect()
            .await
    }
}

fn to_prompt_sources(sources: &[SourceRef]) -> Vec<PromptSource> {
    sources
        .iter()
        .enumerate()
        .map(|(i, s)| PromptSource::new(i + 1, s.scheme.clone(), s.url.clone()))
        .collect()
}

/// Plain-text rendering of a response for the terminal.
pub fn format_response(response: &AnswerResponse) -> String {
    let mut out = String::new();
    out.push_str(&format!("Question: {}\n\n", response.question()));
    out.push_str(response.answer());
    out.push_str("\n\n");

    if !response.sources().is_empty() {
        out.push_str("Sources:\n");
        for (i, source) in response.sources().iter().enumerate() {
            out.push_str(&format!("  [{}] {} - {}\n", i + 1, source.scheme, source.url));
            if !source.description.is_empty() {
                out.push_str(&format!("      {}\n", source.description));
            }
            out.push_str(&format!("      Relevance: {:.4}\n", source.relevance_score));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "Retrieved {} relevant documents\n",
        response.retrieved_docs()
    ));
    out.push_str(&format!("Generated at: {}", response.timestamp()));
    out
}
