//! LLM Client abstractions and provider management
//!
//! Research only ever needs one kind of completion: a system prompt plus a user
//! prompt, answered with a JSON object of a known shape. This module provides
//! that contract for each supported backend:
//! - **OpenAI**: chat completions with a forced function call
//! - **Gemini**: `generateContent` with the schema described in the prompt
//! - **Ollama**: local `/api/chat` with a JSON-schema `format`

use crate::types::{AppError, Result};
use async_trait::async_trait;
use schemars::generate::SchemaSettings;
use schemars::JsonSchema;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Timeout applied to every request made by a provider client.
pub const LLM_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Generic LLM client trait for provider abstraction
///
/// All LLM providers implement this trait, allowing for easy swapping
/// between providers without changing the research code.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a JSON object matching `schema`
    async fn generate_object(
        &self,
        system: &str,
        prompt: &str,
        schema: &OutputSchema,
    ) -> Result<Value>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

/// Expected response shape for a structured generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    /// Function/schema name presented to the model
    pub name: String,
    pub description: String,
    /// JSON Schema of the object (always `"type": "object"` at the root)
    pub parameters: Value,
}

impl OutputSchema {
    pub const DEFAULT_NAME: &'static str = "generate_response";

    /// Derive the schema from a response type, with sub-schemas inlined.
    pub fn for_type<T: JsonSchema>() -> Self {
        let generator = SchemaSettings::draft07()
            .with(|s| {
                s.inline_subschemas = true;
                s.meta_schema = None;
            })
            .into_generator();
        let schema = generator.into_root_schema_for::<T>();

        let mut parameters = schema.to_value();
        if let Some(obj) = parameters.as_object_mut() {
            obj.remove("title");
            obj.remove("description");
        }

        Self {
            name: Self::DEFAULT_NAME.to_string(),
            description: "Generate structured response".to_string(),
            parameters,
        }
    }

    /// Top-level property names.
    pub fn field_names(&self) -> Vec<&str> {
        self.parameters
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Provider enum for runtime selection
///
/// Built once from configuration at startup and handed to
/// [`LLMClientFactory`]; nothing re-probes the environment afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Provider {
    /// OpenAI API provider (including compatible endpoints)
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::OpenAI {
    ///     api_key: "sk-...".to_string(),
    ///     api_base: "https://api.openai.com/v1".to_string(),
    ///     model: "gpt-4o-mini".to_string(),
    ///     temperature: 0.7,
    /// };
    /// ```
    OpenAI {
        api_key: String,
        api_base: String,
        model: String,
        temperature: f32,
    },

    /// Google Gemini API provider
    Gemini {
        api_key: String,
        api_base: String,
        model: String,
        temperature: f32,
    },

    /// Ollama local LLM provider
    ///
    /// Structured output requires a model that honours the `format` field
    /// (llama3.1+, qwen2.5, mistral-nemo).
    Ollama {
        base_url: String,
        model: String,
        temperature: f32,
    },
}

impl Provider {
    /// Create a client instance for this provider
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] when credentials are missing or the
    /// HTTP client cannot be built.
    pub fn create_client(&self) -> Result<Arc<dyn LLMClient>> {
        match self {
            Provider::OpenAI {
                api_key,
                api_base,
                model,
                temperature,
            } => {
                if api_key.trim().is_empty() {
                    return Err(AppError::Unavailable(
                        "OpenAI client not initialized. Please set OPENAI_KEY environment variable."
                            .to_string(),
                    ));
                }
                Ok(Arc::new(super::openai::OpenAIClient::new(
                    api_key.clone(),
                    api_base.clone(),
                    model.clone(),
                    *temperature,
                )?))
            }

            Provider::Gemini {
                api_key,
                api_base,
                model,
                temperature,
            } => {
                if api_key.trim().is_empty() {
                    return Err(AppError::Unavailable(
                        "Gemini model not initialized. Please set GEMINI_KEY environment variable."
                            .to_string(),
                    ));
                }
                Ok(Arc::new(super::gemini::GeminiClient::new(
                    api_key.clone(),
                    api_base.clone(),
                    model.clone(),
                    *temperature,
                )?))
            }

            Provider::Ollama {
                base_url,
                model,
                temperature,
            } => Ok(Arc::new(super::ollama::OllamaClient::new(
                base_url.clone(),
                model.clone(),
                *temperature,
            )?)),
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "OpenAI",
            Provider::Gemini { .. } => "Gemini",
            Provider::Ollama { .. } => "Ollama",
        }
    }

    /// Model identifier configured for this provider
    pub fn model(&self) -> &str {
        match self {
            Provider::OpenAI { model, .. }
            | Provider::Gemini { model, .. }
            | Provider::Ollama { model, .. } => model,
        }
    }
}

/// Configuration-based client factory
///
/// Holds the provider chosen at startup and builds clients for it.
pub struct LLMClientFactory {
    default_provider: Provider,
}

impl LLMClientFactory {
    /// Create a new factory with the specified default provider
    pub fn new(default_provider: Provider) -> Self {
        Self { default_provider }
    }

    /// Create a client using the default provider
    pub fn create_default(&self) -> Result<Arc<dyn LLMClient>> {
        self.default_provider.create_client()
    }

    /// Get a reference to the default provider
    pub fn default_provider(&self) -> &Provider {
        &self.default_provider
    }
}

/// Shared HTTP client builder for provider adapters.
pub(crate) fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(LLM_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| AppError::Unavailable(format!("Failed to build HTTP client: {}", e)))
}
