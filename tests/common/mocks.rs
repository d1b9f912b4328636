//! Mock implementations for testing.
//!
//! Scripted collaborators shared by the integration tests: an LLM client that
//! answers according to the requested schema, and a search provider that
//! counts calls and can be told to come back empty or to panic.

#![allow(dead_code)]

use async_trait::async_trait;
use deep_research::llm::{LLMClient, OutputSchema};
use deep_research::tools::SearchProvider;
use deep_research::types::{AppError, Result, SearchHit};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Text between `<tag>` and `</tag>` in a prompt.
pub fn tagged<'a>(prompt: &'a str, tag: &str) -> &'a str {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    prompt
        .split(open.as_str())
        .nth(1)
        .and_then(|rest| rest.split(close.as_str()).next())
        .unwrap_or_default()
}

/// Mock LLM client that answers by schema shape.
///
/// - planning (`queries`): `queries_per_plan` unique queries
/// - distilling (`learnings`): fixed learnings, or one derived from the query
/// - report / answer / clarifying questions: canned values
///
/// # Examples
///
/// ```ignore
/// let llm = MockLLMClient::new().with_queries_per_plan(10);
/// let llm = MockLLMClient::new().with_learnings(&["Paris is the capital of France"]);
/// let llm = MockLLMClient::failing();
/// ```
pub struct MockLLMClient {
    queries_per_plan: usize,
    learnings: Option<Vec<String>>,
    should_fail: bool,
    plan_calls: AtomicUsize,
    distill_calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl Default for MockLLMClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLLMClient {
    pub fn new() -> Self {
        Self {
            queries_per_plan: 4,
            learnings: None,
            should_fail: false,
            plan_calls: AtomicUsize::new(0),
            distill_calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    pub fn with_queries_per_plan(mut self, n: usize) -> Self {
        self.queries_per_plan = n;
        self
    }

    pub fn with_learnings(mut self, learnings: &[&str]) -> Self {
        self.learnings = Some(learnings.iter().map(|l| l.to_string()).collect());
        self
    }

    pub fn plan_calls(&self) -> usize {
        self.plan_calls.load(Ordering::SeqCst)
    }

    pub fn distill_calls(&self) -> usize {
        self.distill_calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn plan(&self) -> Value {
        let call = self.plan_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let queries: Vec<Value> = (0..self.queries_per_plan)
            .map(|i| {
                json!({
                    "query": format!("query {} #{}", call, i),
                    "research_goal": format!("goal {} #{}", call, i)
                })
            })
            .collect();
        json!({ "queries": queries })
    }

    fn distill(&self, prompt: &str) -> Value {
        self.distill_calls.fetch_add(1, Ordering::SeqCst);
        let learnings = match &self.learnings {
            Some(fixed) => fixed.clone(),
            None => vec![format!("learned about {}", tagged(prompt, "query"))],
        };
        json!({
            "learnings": learnings,
            "follow_up_questions": ["What changed recently?", "Who are the main players?", "What is next?"]
        })
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate_object(
        &self,
        _system: &str,
        prompt: &str,
        schema: &OutputSchema,
    ) -> Result<Value> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }

        let fields = schema.field_names();
        if fields.contains(&"queries") {
            Ok(self.plan())
        } else if fields.contains(&"learnings") {
            Ok(self.distill(prompt))
        } else if fields.contains(&"report_markdown") {
            Ok(json!({"report_markdown": "# Research Report\n\nEverything we learned."}))
        } else if fields.contains(&"exact_answer") {
            Ok(json!({"exact_answer": "Paris"}))
        } else if fields.contains(&"questions") {
            Ok(json!({"questions": ["Which time frame?", "Which region?"]}))
        } else {
            Ok(json!({}))
        }
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Search provider that counts calls.
pub struct MockSearch {
    calls: AtomicUsize,
    empty: bool,
    panic_on: Option<String>,
    delay: Option<Duration>,
    queries: Mutex<Vec<String>>,
}

impl Default for MockSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSearch {
    /// One hit per query, with a URL derived from the query.
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            empty: false,
            panic_on: None,
            delay: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Every search comes back with no results.
    pub fn empty() -> Self {
        Self {
            empty: true,
            ..Self::new()
        }
    }

    /// Panic when asked for exactly `query`.
    pub fn panicking_on(query: &str) -> Self {
        Self {
            panic_on: Some(query.to_string()),
            ..Self::new()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn url_for(query: &str) -> String {
        format!("https://example.com/{}", query.replace([' ', '#'], "-"))
    }
}

#[async_trait]
impl SearchProvider for MockSearch {
    async fn search(&self, query: &str, _limit: usize) -> Vec<SearchHit> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.panic_on.as_deref() == Some(query) {
            panic!("search backend exploded on {}", query);
        }
        if self.empty {
            return Vec::new();
        }

        vec![SearchHit::new(
            Self::url_for(query),
            format!("Page content about {}", query),
        )]
    }
}
