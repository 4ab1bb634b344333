//! Prompt types.

use serde::{Deserialize, Serialize};

/// Identifier of the template compiled into the binary.
pub const BUILTIN_PROMPT_ID: &str = "fundqa.answer.default";

const BUILTIN_TEMPLATE: &str = r#"You are a factual mutual fund information assistant. Your role is to provide accurate, fact-based answers ONLY using the information provided in the context below.

IMPORTANT RULES:
1. Answer ONLY based on the provided context
2. If the context doesn't contain the answer, say "I don't have enough information to answer this question." Do not guess.
3. ALWAYS cite sources using [Source N] format
4. Do NOT provide investment advice or recommendations
5. Be concise and factual
6. Include relevant numbers, percentages, and specific details from the context

DISCLAIMER: This is for informational purposes only and does not constitute investment advice.

CONTEXT:
{{context}}

QUESTION: {{question}}

Please provide a factual answer with source citations. Format your response as:

Answer: [Your factual answer with [Source N] citations]

Sources:
[List the sources you referenced]
{{#each sources}}
[Source {{index}}] {{scheme}} - {{url}}
{{/each}}

Last updated: {{as_of}}
"#;

/// A prompt definition, either built in or loaded from YAML.
///
/// Templates see four variables: `question`, `context`, `sources`
/// (each with `index`, `scheme`, `url`), and `as_of`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Template string with Handlebars syntax
    pub template: String,
}

impl PromptDefinition {
    /// The answer template shipped with fundqa.
    pub fn builtin() -> Self {
        Self {
            id: BUILTIN_PROMPT_ID.to_string(),
            title: "Factual fund answer with citations".to_string(),
            api_version: "1.0".to_string(),
            created_by: "fundqa".to_string(),
            template: BUILTIN_TEMPLATE.to_string(),
        }
    }
}

/// One entry of the numbered reference list in a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSource {
    /// 1-based position matching the `[Source N]` marker in the context
    pub index: usize,
    pub scheme: String,
    pub url: String,
}

impl PromptSource {
    pub fn new(index: usize, scheme: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            index,
            scheme: scheme.into(),
            url: url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
id: custom.answer
title: Custom
apiVersion: "1.0"
template: "Q: {{question}}\n{{context}}"
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "custom.answer");
        assert_eq!(def.api_version, "1.0");
        assert!(def.created_by.is_empty());
    }

    #[test]
    fn test_builtin_mentions_all_variables() {
        let def = PromptDefinition::builtin();
        for var in ["{{context}}", "{{question}}", "{{#each sources}}", "{{as_of}}"] {
            assert!(def.template.contains(var), "missing {}", var);
        }
    }
}
