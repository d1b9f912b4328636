//! LLM Provider Clients and Abstractions
//!
//! This module provides a unified interface for asking a language model for
//! structured output. Provider-specific mechanics stay behind [`LLMClient`];
//! the research code only ever sees typed responses via [`structured`].
//!
//! # Architecture
//!
//! - [`LLMClient`] - The core trait that all providers implement
//! - [`Provider`] - Closed set of backends, chosen once from configuration
//! - [`LLMClientFactory`] - Creates clients for the configured provider
//! - [`structured`] - Schema derivation and degrade-to-default parsing
//!
//! # Example
//!
//! ```ignore
//! use deep_research::llm::{structured, LLMClientFactory, Provider};
//!
//! let factory = LLMClientFactory::new(provider);
//! let client = factory.create_default()?;
//!
//! let digest: SerpDigest = structured::generate(client.as_ref(), &system, &prompt).await;
//! ```

/// Core LLM client trait, output schema and provider enum.
pub mod client;
/// Google Gemini backend.
pub mod gemini;
/// Local Ollama backend.
pub mod ollama;
/// OpenAI and compatible backends.
pub mod openai;
/// Typed structured generation helpers.
pub mod structured;

pub use client::{LLMClient, LLMClientFactory, OutputSchema, Provider};
