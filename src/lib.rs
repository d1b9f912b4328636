//! # deep-research
//!
//! Recursive, breadth/depth-bounded web research driven by a language model.
//!
//! A topic is turned into a tree of web searches. Every search result set is
//! distilled into short, information-dense learnings plus follow-up questions,
//! and each branch recurses with a narrower breadth until its depth budget is
//! spent. All learnings and visited URLs are unioned into a single result that
//! can be rendered as a long report or a short answer.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use deep_research::{
//!     FirecrawlClient, FirecrawlOptions, Provider, ResearchCoordinator, ResearchOptions,
//!     utils::trim::PromptTrimmer,
//! };
//! use std::{sync::Arc, time::Duration};
//!
//! #[tokio::main]
//! async fn main() -> deep_research::Result<()> {
//!     let llm = Provider::Ollama {
//!         base_url: "http://localhost:11434".to_string(),
//!         model: "llama3.2".to_string(),
//!         temperature: 0.7,
//!     }
//!     .create_client()?;
//!
//!     let search = Arc::new(FirecrawlClient::new(FirecrawlOptions {
//!         api_key: std::env::var("FIRECRAWL_KEY").unwrap_or_default(),
//!         base_url: "https://api.firecrawl.dev".to_string(),
//!         concurrency_limit: 2,
//!         timeout: Duration::from_secs(15),
//!     })?);
//!
//!     let coordinator = ResearchCoordinator::new(
//!         llm,
//!         search,
//!         Arc::new(PromptTrimmer::new()?),
//!         ResearchOptions::default(),
//!     );
//!
//!     let result = coordinator.research("perovskite solar cell durability", 4, 2).await?;
//!     println!("{} learnings from {} sources", result.learnings.len(), result.visited_urls.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`research`] - Planner, distiller, recursive coordinator and synthesis
//! - [`llm`] - Structured-output LLM clients (OpenAI, Gemini, Ollama)
//! - [`tools`] - Web search
//! - [`types`] - Data model and error handling
//! - [`utils`] - Configuration and prompt trimming
//! - [`cli`] - Command-line definition and terminal output

#![warn(rustdoc::missing_crate_level_docs)]

/// Command-line definition, prompts and colored output.
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// Recursive research orchestration.
pub mod research;
/// Web search collaborators.
pub mod tools;
/// Core types (data model, errors).
pub mod types;
/// Configuration and token utilities.
pub mod utils;

// Re-export commonly used types
pub use llm::{LLMClient, LLMClientFactory, OutputSchema, Provider};
pub use research::{ResearchCoordinator, ResearchOptions, Synthesizer};
pub use tools::{FirecrawlClient, FirecrawlOptions, SearchProvider};
pub use types::{AppError, ResearchResult, ResearchState, Result};
pub use utils::toml_config::{ConfigError, ResearchConfig};
