//! Web search via Firecrawl
//!
//! The search collaborator turns a query into page URLs plus their markdown
//! bodies. It never fails past its own boundary: timeouts, HTTP errors and
//! malformed payloads are logged and reported as "no results".

use crate::types::{AppError, Result, SearchHit};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Anything that can answer a web search with retrieved page content.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search for `query`, returning at most `limit` hits (empty on failure).
    async fn search(&self, query: &str, limit: usize) -> Vec<SearchHit>;
}

/// Settings for [`FirecrawlClient`].
#[derive(Debug, Clone)]
pub struct FirecrawlOptions {
    pub api_key: String,
    pub base_url: String,
    /// Maximum number of requests in flight at once
    pub concurrency_limit: usize,
    pub timeout: Duration,
}

/// Firecrawl `/v1/search` client with a process-wide in-flight request gate.
pub struct FirecrawlClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    /// Semaphore to limit concurrent requests
    slots: Arc<Semaphore>,
}

#[derive(Debug, Deserialize)]
struct FirecrawlResponse {
    #[serde(default)]
    data: Vec<FirecrawlDocument>,
}

#[derive(Debug, Deserialize)]
struct FirecrawlDocument {
    url: Option<String>,
    markdown: Option<String>,
    #[serde(default)]
    metadata: Option<FirecrawlMetadata>,
}

#[derive(Debug, Deserialize)]
struct FirecrawlMetadata {
    #[serde(rename = "sourceURL")]
    source_url: Option<String>,
}

impl From<FirecrawlDocument> for SearchHit {
    fn from(doc: FirecrawlDocument) -> Self {
        let url = doc
            .url
            .or_else(|| doc.metadata.and_then(|m| m.source_url))
            .filter(|u| !u.trim().is_empty());
        let content = doc.markdown.filter(|m| !m.trim().is_empty());

        SearchHit { url, content }
    }
}

impl FirecrawlClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] when the API key is empty or the
    /// HTTP client cannot be built.
    pub fn new(options: FirecrawlOptions) -> Result<Self> {
        if options.api_key.trim().is_empty() {
            return Err(AppError::Unavailable(
                "FIRECRAWL_KEY environment variable is required".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| AppError::Unavailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: options.api_key,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            slots: Arc::new(Semaphore::new(options.concurrency_limit.max(1))),
        })
    }

    /// Number of request slots currently free.
    pub fn available_slots(&self) -> usize {
        self.slots.available_permits()
    }

    async fn try_search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        // Acquire a permit (waits while the gate is at capacity)
        let _permit = self
            .slots
            .acquire()
            .await
            .map_err(|e| AppError::Internal(format!("Search limiter closed: {}", e)))?;

        let url = format!("{}/v1/search", self.base_url);
        let payload = json!({
            "query": query,
            "limit": limit,
            "scrapeOptions": {
                "formats": ["markdown"]
            }
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Search(format!("Search timeout for query: {}", query))
                } else {
                    AppError::Search(format!("Search error for query {}: {}", query, e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Search(format!(
                "Search failed with status {}: {}",
                status, text
            )));
        }

        let body: FirecrawlResponse = response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Invalid search response: {}", e)))?;

        Ok(body
            .data
            .into_iter()
            .map(SearchHit::from)
            .filter(|hit| hit.url.is_some() || hit.content.is_some())
            .take(limit)
            .collect())
    }
}

#[async_trait]
impl SearchProvider for FirecrawlClient {
    async fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        match self.try_search(query, limit).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!("{}", e);
                Vec::new()
            }
        }
    }
}
