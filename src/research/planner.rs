use crate::llm::{structured, LLMClient};
use crate::research::prompts;
use crate::types::SerpQuery;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

/// Model response for query planning.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct SerpQueryList {
    /// List of SERP queries
    #[serde(default)]
    pub queries: Vec<SerpQuery>,
}

/// Turns a topic (and what is already known about it) into search queries.
#[derive(Clone)]
pub struct QueryPlanner {
    llm: Arc<dyn LLMClient>,
}

impl QueryPlanner {
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self { llm }
    }

    /// Ask for at most `max_queries` distinct queries.
    ///
    /// The model may return fewer; excess entries are dropped and blank
    /// queries discarded. A failed call yields an empty list.
    pub async fn plan(
        &self,
        topic: &str,
        max_queries: usize,
        prior_learnings: &[String],
    ) -> Vec<SerpQuery> {
        let prompt = prompts::serp_queries_prompt(topic, max_queries, prior_learnings);
        let response: SerpQueryList =
            structured::generate(self.llm.as_ref(), &prompts::system_prompt(), &prompt).await;

        let queries: Vec<SerpQuery> = response
            .queries
            .into_iter()
            .filter(|q| !q.query.trim().is_empty())
            .take(max_queries)
            .collect();

        tracing::info!("Created {} queries", queries.len());
        for q in &queries {
            tracing::debug!(query = %q.query, "Planned query");
        }

        queries
    }
}
