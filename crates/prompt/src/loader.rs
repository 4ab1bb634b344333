//! Loads YAML prompt definitions that replace the built-in template.

use crate::types::PromptDefinition;
use fundqa_core::{AppError, AppResult};
use std::path::Path;

/// Load and validate a prompt definition from a YAML file.
///
/// # Example
/// ```no_run
/// use fundqa_prompt::{load_prompt_file, PromptBuilder};
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let def = load_prompt_file(Path::new(".fundqa/prompts/answer.yml"))?;
/// let builder = PromptBuilder::from_definition(&def)?;
/// # Ok(())
/// # }
/// ```
pub fn load_prompt_file(path: &Path) -> AppResult<PromptDefinition> {
    tracing::debug!("Loading prompt from: {:?}", path);

    if !path.exists() {
        return Err(AppError::Prompt(format!("Prompt file not found: {:?}", path)));
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Prompt(format!("Failed to read prompt file {:?}: {}", path, e))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!("Failed to parse prompt YAML {:?}: {}", path, e))
    })?;

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: '{}'. Expected format: 'x.y'",
            def.api_version
        )));
    }

    // Both inputs must reach the model.
    for required in ["{{question}}", "{{context}}"] {
        if !def.template.contains(required) {
            return Err(AppError::Prompt(format!(
                "Prompt template '{}' must reference {}",
                def.id, required
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_prompt() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "answer.yml",
            r#"
id: custom.answer
title: "Custom answer"
apiVersion: "1.0"
template: "Context:\n{{context}}\nQ: {{question}}"
"#,
        );

        let prompt = load_prompt_file(&path).unwrap();
        assert_eq!(prompt.id, "custom.answer");
        assert_eq!(prompt.title, "Custom answer");
    }

    #[test]
    fn test_load_nonexistent_prompt() {
        let dir = TempDir::new().unwrap();
        assert!(load_prompt_file(&dir.path().join("missing.yml")).is_err());
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "bad.yml", "invalid: yaml: content:");
        assert!(matches!(load_prompt_file(&path), Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_template_must_reference_context() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "noctx.yml",
            r#"
id: noctx
title: "No context"
apiVersion: "1.0"
template: "Q: {{question}}"
"#,
        );

        let err = load_prompt_file(&path).unwrap_err();
        assert!(err.to_string().contains("{{context}}"));
    }

    #[test]
    fn test_bad_api_version() {
        let def = PromptDefinition {
            api_version: "1".to_string(),
            ..PromptDefinition::builtin()
        };
        assert!(validate_prompt(&def).is_err());
        assert!(validate_prompt(&PromptDefinition::builtin()).is_ok());
    }
}
