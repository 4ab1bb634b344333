//! Configuration management for fundqa.
//!
//! Settings are layered, later sources winning:
//! - Built-in defaults
//! - Config file (`.fundqa/config.yaml` or `--config`)
//! - Environment variables (`FUNDQA_*`)
//! - Command-line flags
//!
//! The workspace directory holds all persisted state under `.fundqa/`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Generation backends fundqa knows how to talk to.
pub const KNOWN_PROVIDERS: [&str; 2] = ["gemini", "grok"];

/// Directory name for workspace state.
pub const DATA_DIR: &str = ".fundqa";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .fundqa/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Active generation provider ("gemini" or "grok")
    pub provider: String,

    /// Model override; falls back to the provider table, then the provider default
    pub model: Option<String>,

    /// Explicit API key (takes precedence over the provider's `apiKeyEnv`)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Default sampling temperature
    pub temperature: f32,

    /// Token budget for generated answers
    pub max_tokens: u32,

    /// Default number of passages to retrieve
    pub top_k: usize,

    /// Bound for each index query and generation call
    pub timeout_secs: u64,

    /// Index file override (default: `.fundqa/index.sqlite`)
    pub index_path: Option<PathBuf>,

    /// Optional YAML prompt definition replacing the built-in template
    pub prompt_file: Option<PathBuf>,

    /// Chunk size for ingestion, in characters
    pub chunk_size: usize,

    /// Overlap between consecutive chunks, in characters
    pub chunk_overlap: usize,

    /// Embedding settings for the index
    pub embedding: EmbeddingSettings,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Provider table from config.yaml
    pub llm: Option<LlmConfig>,
}

/// Embedding settings used by the index adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    pub provider: String,
    pub dimensions: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "trigram".to_string(),
            dimensions: 384,
        }
    }
}

/// LLM section of config.yaml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider", default)]
    pub active_provider: Option<String>,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Per-provider settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(rename = "apiKeyEnv", default)]
    pub api_key_env: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    workspace: Option<WorkspaceSection>,
    logging: Option<LoggingSection>,
    generation: Option<GenerationSection>,
    retrieval: Option<RetrievalSection>,
    prompt: Option<PromptSection>,
    embedding: Option<EmbeddingSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct WorkspaceSection {
    path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GenerationSection {
    temperature: Option<f32>,
    #[serde(rename = "maxTokens")]
    max_tokens: Option<u32>,
    #[serde(rename = "timeoutSecs")]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RetrievalSection {
    #[serde(rename = "topK")]
    top_k: Option<usize>,
    #[serde(rename = "indexPath")]
    index_path: Option<String>,
    #[serde(rename = "chunkSize")]
    chunk_size: Option<usize>,
    #[serde(rename = "chunkOverlap")]
    chunk_overlap: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PromptSection {
    file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EmbeddingSection {
    provider: Option<String>,
    dimensions: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "gemini".to_string(),
            model: None,
            api_key: None,
            temperature: 0.1,
            max_tokens: 1000,
            top_k: 3,
            timeout_secs: 30,
            index_path: None,
            prompt_file: None,
            chunk_size: 1000,
            chunk_overlap: 200,
            embedding: EmbeddingSettings::default(),
            log_level: None,
            verbose: false,
            no_color: false,
            llm: None,
        }
    }
}

/// True when a credential is blank or still the sample value (`your_..._here`).
pub fn is_placeholder_credential(value: &str) -> bool {
    let trimmed = value.trim().to_lowercase();
    trimmed.is_empty() || (trimmed.starts_with("your_") && trimmed.ends_with("_here"))
}

/// Default model for a known provider.
pub fn default_model(provider: &str) -> Option<&'static str> {
    match provider {
        "gemini" => Some("gemini-1.5-flash"),
        "grok" => Some("grok-beta"),
        _ => None,
    }
}

/// Default environment variable holding a provider's API key.
pub fn default_api_key_env(provider: &str) -> String {
    format!("{}_API_KEY", provider.to_uppercase().replace('-', "_"))
}

impl AppConfig {
    /// Load configuration from defaults, config file, and environment.
    ///
    /// Environment variables:
    /// - `FUNDQA_WORKSPACE`, `FUNDQA_CONFIG`
    /// - `FUNDQA_PROVIDER`, `FUNDQA_MODEL`, `FUNDQA_API_KEY`
    /// - `FUNDQA_TEMPERATURE`, `FUNDQA_MAX_TOKENS`, `FUNDQA_TOP_K`, `FUNDQA_TIMEOUT_SECS`
    /// - `FUNDQA_INDEX`
    /// - `NO_COLOR`
    pub fn load() -> AppResult<Self> {
        Self::load_from(None, None)
    }

    /// Load configuration, with the workspace and config file optionally
    /// fixed by the caller before the file layer is read.
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) = workspace.or_else(|| env_path("FUNDQA_WORKSPACE")) {
            config.workspace = workspace;
        }
        config.config_file = config_file.or_else(|| env_path("FUNDQA_CONFIG"));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.data_dir().join("config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        config.apply_env()?;

        Ok(config)
    }

    fn apply_env(&mut self) -> AppResult<()> {
        if let Ok(provider) = std::env::var("FUNDQA_PROVIDER") {
            self.provider = provider.trim().to_lowercase();
        }

        if let Ok(model) = std::env::var("FUNDQA_MODEL") {
            self.model = Some(model);
        }

        if let Ok(key) = std::env::var("FUNDQA_API_KEY") {
            self.api_key = Some(key);
        }

        if let Some(value) = env_parse::<f32>("FUNDQA_TEMPERATURE")? {
            self.temperature = value;
        }
        if let Some(value) = env_parse::<u32>("FUNDQA_MAX_TOKENS")? {
            self.max_tokens = value;
        }
        if let Some(value) = env_parse::<usize>("FUNDQA_TOP_K")? {
            self.top_k = value;
        }
        if let Some(value) = env_parse::<u64>("FUNDQA_TIMEOUT_SECS")? {
            self.timeout_secs = value;
        }

        if let Some(path) = env_path("FUNDQA_INDEX") {
            self.index_path = Some(path);
        }

        if std::env::var_os("NO_COLOR").is_some() {
            self.no_color = true;
        }

        Ok(())
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(path) = file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(generation) = file.generation {
            result.temperature = generation.temperature.unwrap_or(result.temperature);
            result.max_tokens = generation.max_tokens.unwrap_or(result.max_tokens);
            result.timeout_secs = generation.timeout_secs.unwrap_or(result.timeout_secs);
        }

        if let Some(retrieval) = file.retrieval {
            result.top_k = retrieval.top_k.unwrap_or(result.top_k);
            result.chunk_size = retrieval.chunk_size.unwrap_or(result.chunk_size);
            result.chunk_overlap = retrieval.chunk_overlap.unwrap_or(result.chunk_overlap);
            if let Some(index_path) = retrieval.index_path {
                result.index_path = Some(result.resolve_relative(index_path));
            }
        }

        if let Some(file_path) = file.prompt.and_then(|p| p.file) {
            result.prompt_file = Some(result.resolve_relative(file_path));
        }

        if let Some(embedding) = file.embedding {
            if let Some(provider) = embedding.provider {
                result.embedding.provider = provider;
            }
            if let Some(dimensions) = embedding.dimensions {
                result.embedding.dimensions = dimensions;
            }
        }

        if let Some(llm) = file.llm {
            if let Some(ref active) = llm.active_provider {
                result.provider = active.trim().to_lowercase();
            }
            result.llm = Some(llm);
        }

        Ok(result)
    }

    fn resolve_relative(&self, path: String) -> PathBuf {
        let path = PathBuf::from(path);
        if path.is_absolute() {
            path
        } else {
            self.workspace.join(path)
        }
    }

    /// Apply CLI overrides to the configuration.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        top_k: Option<usize>,
        timeout_secs: Option<u64>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider.trim().to_lowercase();
        }

        if let Some(model) = model {
            self.model = Some(model);
        }

        if let Some(top_k) = top_k {
            self.top_k = top_k;
        }

        if let Some(timeout_secs) = timeout_secs {
            self.timeout_secs = timeout_secs;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Path to the .fundqa directory.
    pub fn data_dir(&self) -> PathBuf {
        self.workspace.join(DATA_DIR)
    }

    /// Ensure the .fundqa directory exists.
    pub fn ensure_data_dir(&self) -> AppResult<()> {
        let dir = self.data_dir();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                AppError::Config(format!("Failed to create {} directory: {}", DATA_DIR, e))
            })?;
        }
        Ok(())
    }

    /// Location of the persisted chunk index.
    pub fn index_path(&self) -> PathBuf {
        self.index_path
            .clone()
            .unwrap_or_else(|| self.data_dir().join("index.sqlite"))
    }

    /// Settings for one provider from the config file, if present.
    pub fn provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.llm.as_ref().and_then(|llm| llm.providers.get(provider))
    }

    /// Model for the active provider.
    pub fn effective_model(&self) -> Option<String> {
        self.model
            .clone()
            .or_else(|| {
                self.provider_config(&self.provider)
                    .and_then(|pc| pc.model.clone())
            })
            .or_else(|| default_model(&self.provider).map(str::to_string))
    }

    /// Endpoint override for the active provider.
    pub fn endpoint(&self) -> Option<String> {
        self.provider_config(&self.provider)
            .and_then(|pc| pc.endpoint.clone())
    }

    /// Environment variable consulted for a provider's API key.
    pub fn api_key_env(&self, provider: &str) -> String {
        self.provider_config(provider)
            .and_then(|pc| pc.api_key_env.clone())
            .unwrap_or_else(|| default_api_key_env(provider))
    }

    /// Resolve the API key for a provider, explicit key first.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        std::env::var(self.api_key_env(provider)).ok()
    }

    /// Validate settings for answering questions with the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.as_str();
        if !KNOWN_PROVIDERS.contains(&provider) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        match self.resolve_api_key(provider) {
            Some(key) if !is_placeholder_credential(&key) => {}
            Some(_) => {
                return Err(AppError::Config(format!(
                    "API key for '{}' is a placeholder. Set {} to a real key.",
                    provider,
                    self.api_key_env(provider)
                )));
            }
            None => {
                return Err(AppError::Config(format!(
                    "API key not found in environment variable: {}",
                    self.api_key_env(provider)
                )));
            }
        }

        match self.effective_model() {
            Some(model) if !model.trim().is_empty() => {}
            _ => {
                return Err(AppError::Config(format!(
                    "No model configured for provider '{}'",
                    provider
                )));
            }
        }

        self.validate_numbers()
    }

    /// Validate numeric settings only (used by commands that never call a provider).
    pub fn validate_numbers(&self) -> AppResult<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AppError::Config(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(AppError::Config("maxTokens must be positive".to_string()));
        }
        if self.top_k == 0 {
            return Err(AppError::Config("topK must be positive".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::Config("timeoutSecs must be positive".to_string()));
        }
        if self.chunk_size == 0 || self.chunk_overlap >= self.chunk_size {
            return Err(AppError::Config(format!(
                "Chunk overlap ({}) must be smaller than chunk size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn env_parse<T>(name: &str) -> AppResult<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AppError::Config(format!("Invalid value for {}: {} ({})", name, raw, e))),
        Err(_) => Ok(None),
    }
}
