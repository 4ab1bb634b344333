//! Prompt builder: renders the answer template for one question.

use crate::types::{PromptDefinition, PromptSource};
use chrono::{Local, NaiveDate};
use fundqa_core::{AppError, AppResult};
use handlebars::Handlebars;
use serde::Serialize;

/// Renders a validated template. Construct once and share.
pub struct PromptBuilder {
    handlebars: Handlebars<'static>,
    prompt_id: String,
}

#[derive(Serialize)]
struct PromptVars<'a> {
    question: &'a str,
    context: &'a str,
    sources: &'a [PromptSource],
    as_of: String,
}

impl PromptBuilder {
    /// Builder using the built-in template.
    pub fn new() -> AppResult<Self> {
        Self::from_definition(&PromptDefinition::builtin())
    }

    /// Compile a prompt definition. Template syntax errors surface here,
    /// not at answer time.
    pub fn from_definition(definition: &PromptDefinition) -> AppResult<Self> {
        let mut handlebars = Handlebars::new();

        // Plain text, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars
            .register_template_string(&definition.id, &definition.template)
            .map_err(|e| {
                AppError::Prompt(format!(
                    "Failed to register template '{}': {}",
                    definition.id, e
                ))
            })?;

        tracing::debug!("Prompt template ready: {}", definition.id);

        Ok(Self {
            handlebars,
            prompt_id: definition.id.clone(),
        })
    }

    pub fn prompt_id(&self) -> &str {
        &self.prompt_id
    }

    /// Render the prompt stamped with today's local date.
    pub fn create_prompt(
        &self,
        question: &str,
        context: &str,
        sources: &[PromptSource],
    ) -> AppResult<String> {
        self.create_prompt_as_of(question, context, sources, Local::now().date_naive())
    }

    /// Render the prompt for a fixed date. Same inputs, same output.
    pub fn create_prompt_as_of(
        &self,
        question: &str,
        context: &str,
        sources: &[PromptSource],
        as_of: NaiveDate,
    ) -> AppResult<String> {
        let vars = PromptVars {
            question,
            context,
            sources,
            as_of: as_of.format("%B %d, %Y").to_string(),
        };

        self.handlebars
            .render(&self.prompt_id, &vars)
            .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn sources() -> Vec<PromptSource> {
        vec![
            PromptSource::new(1, "HDFC Flexi Cap Fund", "https://example.com/flexi"),
            PromptSource::new(2, "HDFC ELSS Tax Saver", "https://example.com/elss"),
        ]
    }

    #[test]
    fn test_sections_in_order() {
        let builder = PromptBuilder::new().unwrap();
        let context = "[Source 1]\nExpense ratio is 1.05%\n";
        let prompt = builder
            .create_prompt_as_of("What is the expense ratio?", context, &sources(), date())
            .unwrap();

        let role = prompt.find("You are a factual mutual fund information assistant").unwrap();
        let rules = prompt.find("IMPORTANT RULES:").unwrap();
        let ctx = prompt.find(context).unwrap();
        let question = prompt.find("QUESTION: What is the expense ratio?").unwrap();
        let answer = prompt.find("Answer:").unwrap();
        let srcs = prompt.find("Sources:").unwrap();
        let updated = prompt.find("Last updated: October 19, 2026").unwrap();

        assert!(role < rules);
        assert!(rules < ctx);
        assert!(ctx < question);
        assert!(question < answer);
        assert!(answer < srcs);
        assert!(srcs < updated);
    }

    #[test]
    fn test_rules_present() {
        let prompt = PromptBuilder::new()
            .unwrap()
            .create_prompt_as_of("q", "c", &[], date())
            .unwrap();

        assert!(prompt.contains("[Source N]"));
        assert!(prompt.contains("Do NOT provide investment advice or recommendations"));
        assert!(prompt.contains("I don't have enough information to answer this question."));
        assert!(prompt.contains("Be concise and factual"));
    }

    #[test]
    fn test_source_reference_list() {
        let prompt = PromptBuilder::new()
            .unwrap()
            .create_prompt_as_of("q", "c", &sources(), date())
            .unwrap();

        assert!(prompt.contains("[Source 1] HDFC Flexi Cap Fund - https://example.com/flexi"));
        assert!(prompt.contains("[Source 2] HDFC ELSS Tax Saver - https://example.com/elss"));
    }

    #[test]
    fn test_deterministic() {
        let builder = PromptBuilder::new().unwrap();
        let a = builder.create_prompt_as_of("q", "ctx", &sources(), date()).unwrap();
        let b = builder.create_prompt_as_of("q", "ctx", &sources(), date()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_html_escaping() {
        let prompt = PromptBuilder::new()
            .unwrap()
            .create_prompt_as_of("Is <A> & B's fee > 1%?", "S&P 500 \"TRI\"", &[], date())
            .unwrap();

        assert!(prompt.contains("QUESTION: Is <A> & B's fee > 1%?"));
        assert!(prompt.contains("S&P 500 \"TRI\""));
    }

    #[test]
    fn test_context_with_braces_is_verbatim() {
        let prompt = PromptBuilder::new()
            .unwrap()
            .create_prompt_as_of("q", "{{question}}", &[], date())
            .unwrap();
        assert!(prompt.contains("CONTEXT:\n{{question}}"));
    }

    #[test]
    fn test_invalid_template() {
        let def = PromptDefinition {
            template: "{{#each sources}}unclosed".to_string(),
            ..PromptDefinition::builtin()
        };
        assert!(matches!(
            PromptBuilder::from_definition(&def),
            Err(AppError::Prompt(_))
        ));
    }

    #[test]
    fn test_custom_definition() {
        let def = PromptDefinition {
            id: "custom".to_string(),
            template: "{{question}}|{{context}}|{{as_of}}".to_string(),
            ..PromptDefinition::builtin()
        };
        let builder = PromptBuilder::from_definition(&def).unwrap();
        assert_eq!(builder.prompt_id(), "custom");
        assert_eq!(
            builder.create_prompt_as_of("q", "c", &[], date()).unwrap(),
            "q|c|October 19, 2026"
        );
    }
}
