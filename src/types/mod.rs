use crate::utils::toml_config::ConfigError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============= Planner Types =============

/// A search query produced by the planner, together with the intent behind it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SerpQuery {
    /// The SERP query
    #[serde(default)]
    pub query: String,

    /// First talk about the goal of the research that this query is meant to accomplish,
    /// then go deeper into how to advance the research once the results are found, mention
    /// additional research directions. Be as specific as possible, especially for additional
    /// research directions.
    #[serde(default)]
    pub research_goal: String,
}

impl SerpQuery {
    pub fn new(query: impl Into<String>, research_goal: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            research_goal: research_goal.into(),
        }
    }
}

// ============= Search Types =============

/// One document returned by the search collaborator.
///
/// Either field may be missing on the wire; URLs and bodies are harvested
/// independently of each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: Option<String>,
    pub content: Option<String>,
}

impl SearchHit {
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            content: Some(content.into()),
        }
    }
}

// ============= Distiller Types =============

/// Learnings and follow-up questions distilled from one query's search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SerpDigest {
    /// List of learnings extracted from the contents
    #[serde(default)]
    pub learnings: Vec<String>,

    /// List of follow-up questions to research the topic further
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
}

impl SerpDigest {
    pub fn is_empty(&self) -> bool {
        self.learnings.is_empty() && self.follow_up_questions.is_empty()
    }
}

// ============= Research State =============

/// Accumulated findings of one orchestrator invocation.
///
/// Both collections are value-deduplicated ordered sets, so merging is
/// idempotent and commutative and the final ordering does not depend on
/// which branch finished first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResearchState {
    learnings: BTreeSet<String>,
    visited_urls: BTreeSet<String>,
}

impl ResearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a state from previously accumulated learnings and URLs.
    pub fn with_prior<L, U>(learnings: L, visited_urls: U) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        U: IntoIterator,
        U::Item: Into<String>,
    {
        Self {
            learnings: learnings.into_iter().map(Into::into).collect(),
            visited_urls: visited_urls.into_iter().map(Into::into).collect(),
        }
    }

    /// Learnings as an owned list, used when building prompts.
    pub fn learnings_vec(&self) -> Vec<String> {
        self.learnings.iter().cloned().collect()
    }

    pub fn learning_count(&self) -> usize {
        self.learnings.len()
    }

    pub fn url_count(&self) -> usize {
        self.visited_urls.len()
    }

    pub fn add_learnings<I, S>(&mut self, learnings: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.learnings.extend(learnings.into_iter().map(Into::into));
    }

    pub fn add_urls<I, S>(&mut self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visited_urls.extend(urls.into_iter().map(Into::into));
    }

    /// Union another state into this one.
    pub fn merge(&mut self, other: ResearchState) {
        self.learnings.extend(other.learnings);
        self.visited_urls.extend(other.visited_urls);
    }

    /// Consuming form of [`ResearchState::merge`].
    pub fn merged(mut self, other: ResearchState) -> Self {
        self.merge(other);
        self
    }

    pub fn into_result(self) -> ResearchResult {
        ResearchResult {
            learnings: self.learnings.into_iter().collect(),
            visited_urls: self.visited_urls.into_iter().collect(),
        }
    }
}

/// Terminal, immutable snapshot returned once all recursion has completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub learnings: Vec<String>,
    pub visited_urls: Vec<String>,
}

impl From<ResearchState> for ResearchResult {
    fn from(state: ResearchState) -> Self {
        state.into_result()
    }
}

impl From<ResearchResult> for ResearchState {
    fn from(result: ResearchResult) -> Self {
        ResearchState::with_prior(result.learnings, result.visited_urls)
    }
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No credentials or client could not be constructed. Fatal before research begins.
    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Research branch failed: {0}")]
    Branch(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error must stop the run before any research happens.
    pub fn is_configuration(&self) -> bool {
        matches!(self, AppError::Unavailable(_) | AppError::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
