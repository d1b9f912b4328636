use crate::{
    llm::LLMClient,
    research::{distiller::ResultDistiller, planner::QueryPlanner, prompts},
    tools::SearchProvider,
    types::{AppError, ResearchResult, ResearchState, Result, SerpQuery},
    utils::{toml_config::ResearchConfig, trim::PromptTrimmer},
};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Tunables for one research run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchOptions {
    /// Results requested per search call
    pub result_limit: usize,
    /// Learnings kept per distilled result set
    pub max_learnings: usize,
    pub content_token_limit: usize,
    pub context_token_limit: usize,
    /// Wall-clock budget after which no new branch starts searching
    pub deadline: Option<Duration>,
}

impl Default for ResearchOptions {
    fn default() -> Self {
        Self {
            result_limit: 5,
            max_learnings: 3,
            content_token_limit: 25_000,
            context_token_limit: 128_000,
            deadline: None,
        }
    }
}

impl ResearchOptions {
    pub fn from_config(config: &ResearchConfig) -> Self {
        Self {
            result_limit: config.search.result_limit,
            max_learnings: config.research.max_learnings,
            content_token_limit: config.research.content_token_limit,
            context_token_limit: config.research.context_token_limit,
            deadline: config.research.deadline_secs.map(Duration::from_secs),
        }
    }
}

/// Recursive breadth/depth-bounded research over a search backend.
///
/// Each level plans up to `breadth` queries and runs one branch per query on
/// its own task. A branch searches, distills, and either stops or recurses
/// with halved breadth and one less level of depth. Branches work on private
/// copies of the accumulated state; the parent unions them once all finish.
#[derive(Clone)]
pub struct ResearchCoordinator {
    planner: QueryPlanner,
    distiller: ResultDistiller,
    search: Arc<dyn SearchProvider>,
    options: ResearchOptions,
}

impl ResearchCoordinator {
    pub fn new(
        llm: Arc<dyn LLMClient>,
        search: Arc<dyn SearchProvider>,
        trimmer: Arc<PromptTrimmer>,
        options: ResearchOptions,
    ) -> Self {
        Self {
            planner: QueryPlanner::new(llm.clone()),
            distiller: ResultDistiller::new(
                llm,
                trimmer,
                options.content_token_limit,
                options.context_token_limit,
            ),
            search,
            options,
        }
    }

    /// Execute deep research on a query
    pub async fn research(&self, query: &str, breadth: usize, depth: usize) -> Result<ResearchResult> {
        self.research_with_prior(query, breadth, depth, ResearchState::new())
            .await
    }

    /// Execute deep research, starting from previously gathered findings.
    ///
    /// # Errors
    ///
    /// Only [`AppError::InvalidInput`] for an empty query or a zero
    /// breadth/depth. Everything past validation degrades instead of failing.
    pub async fn research_with_prior(
        &self,
        query: &str,
        breadth: usize,
        depth: usize,
        prior: ResearchState,
    ) -> Result<ResearchResult> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput("Query must not be empty".to_string()));
        }
        if breadth == 0 || depth == 0 {
            return Err(AppError::InvalidInput(format!(
                "Breadth and depth must be at least 1 (got breadth={}, depth={})",
                breadth, depth
            )));
        }

        // A budget too large to represent is treated as no deadline
        let deadline = self
            .options
            .deadline
            .and_then(|budget| Instant::now().checked_add(budget));
        let state = self
            .explore(query.to_string(), breadth, depth, prior, deadline)
            .await;

        tracing::info!(
            learnings = state.learning_count(),
            urls = state.url_count(),
            "Research complete"
        );

        Ok(state.into_result())
    }

    /// One recursion level: plan, fan out, merge.
    fn explore(
        &self,
        query: String,
        breadth: usize,
        depth: usize,
        prior: ResearchState,
        deadline: Option<Instant>,
    ) -> BoxFuture<'static, ResearchState> {
        let this = self.clone();

        async move {
            let queries = this
                .planner
                .plan(&query, breadth, &prior.learnings_vec())
                .await;

            if queries.is_empty() {
                return prior;
            }

            let mut set = JoinSet::new();
            for serp_query in queries {
                let branch = this.clone();
                let inherited = prior.clone();
                set.spawn(async move {
                    branch
                        .run_branch(serp_query, breadth, depth, inherited, deadline)
                        .await
                });
            }

            let mut merged = prior;
            while let Some(joined) = set.join_next().await {
                match joined {
                    Ok(branch_state) => merged.merge(branch_state),
                    // The branch contributes nothing beyond the inherited state
                    Err(e) => tracing::warn!("{}", AppError::Branch(e.to_string())),
                }
            }

            merged
        }
        .boxed()
    }

    /// Search, distill, then recurse or stop.
    async fn run_branch(
        &self,
        serp_query: SerpQuery,
        breadth: usize,
        depth: usize,
        inherited: ResearchState,
        deadline: Option<Instant>,
    ) -> ResearchState {
        if deadline.is_some_and(|at| Instant::now() >= at) {
            tracing::warn!(query = %serp_query.query, "Research deadline reached, skipping branch");
            return inherited;
        }

        let hits = self
            .search
            .search(&serp_query.query, self.options.result_limit)
            .await;

        let mut urls = Vec::new();
        let mut contents = Vec::new();
        for hit in hits {
            if let Some(url) = hit.url {
                urls.push(url);
            }
            if let Some(content) = hit.content {
                contents.push(content);
            }
        }
        tracing::info!("Ran {}, found {} contents", serp_query.query, contents.len());

        let next_breadth = (breadth / 2).max(1);
        let digest = self
            .distiller
            .distill(
                &serp_query.query,
                &contents,
                self.options.max_learnings,
                next_breadth,
            )
            .await;

        let mut state = inherited;
        state.add_learnings(digest.learnings);
        state.add_urls(urls);

        if depth > 1 {
            tracing::info!(
                "Researching deeper, breadth: {}, depth: {}",
                next_breadth,
                depth - 1
            );
            let next_query =
                prompts::next_query(&serp_query.research_goal, &digest.follow_up_questions);
            self.explore(next_query, next_breadth, depth - 1, state, deadline)
                .await
        } else {
            state
        }
    }
}
