use crate::llm::{structured, LLMClient};
use crate::research::prompts;
use crate::types::SerpDigest;
use crate::utils::trim::PromptTrimmer;
use std::sync::Arc;

/// Extracts learnings and follow-up questions from one query's search results.
#[derive(Clone)]
pub struct ResultDistiller {
    llm: Arc<dyn LLMClient>,
    trimmer: Arc<PromptTrimmer>,
    /// Token budget for each page body
    content_token_limit: usize,
    /// Token budget for the whole prompt
    context_token_limit: usize,
}

impl ResultDistiller {
    pub fn new(
        llm: Arc<dyn LLMClient>,
        trimmer: Arc<PromptTrimmer>,
        content_token_limit: usize,
        context_token_limit: usize,
    ) -> Self {
        Self {
            llm,
            trimmer,
            content_token_limit,
            context_token_limit,
        }
    }

    /// Distill `contents` into at most `max_learnings` learnings and
    /// `max_follow_ups` follow-up questions.
    ///
    /// No contents means no model call and an empty digest.
    pub async fn distill(
        &self,
        query: &str,
        contents: &[String],
        max_learnings: usize,
        max_follow_ups: usize,
    ) -> SerpDigest {
        if contents.is_empty() {
            return SerpDigest::default();
        }

        let trimmed: Vec<String> = contents
            .iter()
            .map(|content| self.trimmer.trim(content, self.content_token_limit))
            .collect();

        let prompt = prompts::serp_digest_prompt(query, &trimmed, max_learnings, max_follow_ups);
        let prompt = self.trimmer.trim(&prompt, self.context_token_limit);
        tracing::debug!(query, tokens = self.trimmer.count(&prompt), "Distilling results");

        let mut digest: SerpDigest =
            structured::generate(self.llm.as_ref(), &prompts::system_prompt(), &prompt).await;

        digest.learnings.retain(|l| !l.trim().is_empty());
        digest.learnings.truncate(max_learnings);
        digest.follow_up_questions.retain(|q| !q.trim().is_empty());
        digest.follow_up_questions.truncate(max_follow_ups);

        tracing::info!(
            "Created {} learnings for {}",
            digest.learnings.len(),
            query
        );

        digest
    }
}
