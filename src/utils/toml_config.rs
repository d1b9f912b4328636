//! TOML-based configuration for deep research runs
//!
//! Configuration is read from an optional `research.toml`. Secrets never live
//! in the file: providers name the environment variable holding their key.
//! When no file (or no `[provider]` table) exists, the provider is resolved
//! once from the environment at startup.

use crate::llm::Provider;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "research.toml";

/// Longest accepted `research.deadline_secs` (one week).
pub const MAX_DEADLINE_SECS: u64 = 7 * 24 * 60 * 60;

/// Root configuration structure loaded from research.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Language model backend. `None` means "resolve from the environment".
    #[serde(default)]
    pub provider: Option<ProviderConfig>,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub research: ResearchSettings,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            provider: None,
            search: SearchConfig::default(),
            research: ResearchSettings::default(),
        }
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        /// Environment variable containing API key
        #[serde(default = "default_openai_key_env")]
        api_key_env: String,
        #[serde(default = "default_openai_base")]
        api_base: String,
        #[serde(default = "default_openai_model")]
        model: String,
        #[serde(default = "default_temperature")]
        temperature: f32,
    },
    Gemini {
        /// Environment variable containing API key
        #[serde(default = "default_gemini_key_env")]
        api_key_env: String,
        #[serde(default = "default_gemini_base")]
        api_base: String,
        #[serde(default = "default_gemini_model")]
        model: String,
        #[serde(default = "default_temperature")]
        temperature: f32,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
        #[serde(default = "default_ollama_model")]
        model: String,
        #[serde(default = "default_temperature")]
        temperature: f32,
    },
}

fn default_openai_key_env() -> String {
    "OPENAI_KEY".to_string()
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_gemini_key_env() -> String {
    "GEMINI_KEY".to_string()
}

fn default_gemini_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

impl ProviderConfig {
    pub fn openai() -> Self {
        ProviderConfig::OpenAI {
            api_key_env: default_openai_key_env(),
            api_base: default_openai_base(),
            model: default_openai_model(),
            temperature: default_temperature(),
        }
    }

    pub fn gemini() -> Self {
        ProviderConfig::Gemini {
            api_key_env: default_gemini_key_env(),
            api_base: default_gemini_base(),
            model: default_gemini_model(),
            temperature: default_temperature(),
        }
    }

    pub fn ollama() -> Self {
        ProviderConfig::Ollama {
            base_url: default_ollama_url(),
            model: default_ollama_model(),
            temperature: default_temperature(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProviderConfig::OpenAI { .. } => "openai",
            ProviderConfig::Gemini { .. } => "gemini",
            ProviderConfig::Ollama { .. } => "ollama",
        }
    }

    fn set_model(&mut self, new_model: String) {
        match self {
            ProviderConfig::OpenAI { model, .. }
            | ProviderConfig::Gemini { model, .. }
            | ProviderConfig::Ollama { model, .. } => *model = new_model,
        }
    }
}

// ============= Search Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Environment variable containing the Firecrawl API key
    #[serde(default = "default_search_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_search_base")]
    pub base_url: String,

    /// Maximum number of search requests in flight process-wide
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: usize,

    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,

    /// Results requested per search call
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
}

fn default_search_key_env() -> String {
    "FIRECRAWL_KEY".to_string()
}

fn default_search_base() -> String {
    "https://api.firecrawl.dev".to_string()
}

fn default_concurrency_limit() -> usize {
    2
}

fn default_search_timeout() -> u64 {
    15
}

fn default_result_limit() -> usize {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_search_key_env(),
            base_url: default_search_base(),
            concurrency_limit: default_concurrency_limit(),
            timeout_secs: default_search_timeout(),
            result_limit: default_result_limit(),
        }
    }
}

// ============= Research Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchSettings {
    #[serde(default = "default_breadth")]
    pub breadth: usize,

    #[serde(default = "default_depth")]
    pub depth: usize,

    /// Learnings extracted per search result set
    #[serde(default = "default_max_learnings")]
    pub max_learnings: usize,

    /// Token budget for each retrieved page body
    #[serde(default = "default_content_token_limit")]
    pub content_token_limit: usize,

    /// Token budget for a whole prompt
    #[serde(default = "default_context_token_limit")]
    pub context_token_limit: usize,

    /// Optional wall-clock budget for the whole research tree, at most [`MAX_DEADLINE_SECS`]
    #[serde(default)]
    pub deadline_secs: Option<u64>,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_breadth() -> usize {
    4
}

fn default_depth() -> usize {
    2
}

fn default_max_learnings() -> usize {
    3
}

fn default_content_token_limit() -> usize {
    25_000
}

fn default_context_token_limit() -> usize {
    128_000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            breadth: default_breadth(),
            depth: default_depth(),
            max_learnings: default_max_learnings(),
            content_token_limit: default_content_token_limit(),
            context_token_limit: default_context_token_limit(),
            deadline_secs: None,
            output_dir: default_output_dir(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("No AI provider available. Please set OPENAI_KEY or GEMINI_KEY environment variable, or configure [provider] in research.toml")]
    NoProvider,
}

/// Read a non-blank environment variable.
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl ResearchConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;

        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: ResearchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit file, or `research.toml` if present, or built-in defaults,
    /// then fill the gaps from the process environment.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(DEFAULT_CONFIG_FILE)?,
            None => Self::default(),
        };

        config.apply_env_overrides(env_lookup);
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using the given lookup.
    ///
    /// Provider selection happens here exactly once: an explicit `AI_PROVIDER`
    /// wins, otherwise Gemini is preferred over OpenAI when both keys exist.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.provider.is_none() {
            let explicit = lookup("AI_PROVIDER").map(|p| p.to_lowercase());
            let has_gemini = lookup("GEMINI_KEY").is_some();
            let has_openai = lookup("OPENAI_KEY").is_some();

            self.provider = match explicit.as_deref() {
                Some("gemini") if has_gemini => Some(ProviderConfig::gemini()),
                Some("openai") if has_openai => Some(ProviderConfig::openai()),
                Some("ollama") => Some(ProviderConfig::ollama()),
                _ if has_gemini => Some(ProviderConfig::gemini()),
                _ if has_openai => Some(ProviderConfig::openai()),
                _ => None,
            };

            if let Some(ProviderConfig::OpenAI { api_base, .. }) = self.provider.as_mut() {
                if let Some(endpoint) = lookup("OPENAI_ENDPOINT") {
                    *api_base = endpoint;
                }
            }
        }

        if let (Some(provider), Some(model)) = (self.provider.as_mut(), lookup("CUSTOM_MODEL")) {
            provider.set_model(model);
        }

        if let Some(base_url) = lookup("FIRECRAWL_BASE_URL") {
            self.search.base_url = base_url;
        }

        if let Some(limit) = lookup("CONCURRENCY_LIMIT").and_then(|v| v.trim().parse().ok()) {
            self.search.concurrency_limit = limit;
        }
    }

    /// Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        let research = &self.research;

        if research.breadth == 0 {
            return Err(ConfigError::ValidationError(
                "research.breadth must be at least 1".to_string(),
            ));
        }
        if research.depth == 0 {
            return Err(ConfigError::ValidationError(
                "research.depth must be at least 1".to_string(),
            ));
        }
        if research.max_learnings == 0 {
            return Err(ConfigError::ValidationError(
                "research.max_learnings must be at least 1".to_string(),
            ));
        }

        let floor = crate::utils::trim::MIN_CHUNK_SIZE;
        if research.content_token_limit < floor || research.context_token_limit < floor {
            return Err(ConfigError::ValidationError(format!(
                "token limits must be at least {}",
                floor
            )));
        }

        if research
            .deadline_secs
            .is_some_and(|secs| secs > MAX_DEADLINE_SECS)
        {
            return Err(ConfigError::ValidationError(format!(
                "research.deadline_secs must be at most {}",
                MAX_DEADLINE_SECS
            )));
        }

        if self.search.concurrency_limit == 0 {
            return Err(ConfigError::ValidationError(
                "search.concurrency_limit must be at least 1".to_string(),
            ));
        }
        if self.search.result_limit == 0 {
            return Err(ConfigError::ValidationError(
                "search.result_limit must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Turn the configured provider into a concrete [`Provider`], reading its key.
    pub fn resolve_provider<F>(&self, lookup: F) -> Result<Provider, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = self.provider.as_ref().ok_or(ConfigError::NoProvider)?;

        match provider {
            ProviderConfig::OpenAI {
                api_key_env,
                api_base,
                model,
                temperature,
            } => Ok(Provider::OpenAI {
                api_key: lookup(api_key_env)
                    .ok_or_else(|| ConfigError::MissingEnvVar(api_key_env.clone()))?,
                api_base: api_base.clone(),
                model: model.clone(),
                temperature: *temperature,
            }),
            ProviderConfig::Gemini {
                api_key_env,
                api_base,
                model,
                temperature,
            } => Ok(Provider::Gemini {
                api_key: lookup(api_key_env)
                    .ok_or_else(|| ConfigError::MissingEnvVar(api_key_env.clone()))?,
                api_base: api_base.clone(),
                model: model.clone(),
                temperature: *temperature,
            }),
            ProviderConfig::Ollama {
                base_url,
                model,
                temperature,
            } => Ok(Provider::Ollama {
                base_url: base_url.clone(),
                model: model.clone(),
                temperature: *temperature,
            }),
        }
    }

    /// Get the search API key from the environment
    pub fn search_api_key<F>(&self, lookup: F) -> Result<String, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(&self.search.api_key_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.search.api_key_env.clone()))
    }
}
