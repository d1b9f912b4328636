//! Final report and answer writing
//!
//! Both writers make a single model call over every accumulated learning. A
//! failed call yields an empty body; the report still carries its sources.

use crate::llm::{structured, LLMClient};
use crate::research::prompts;
use crate::utils::trim::PromptTrimmer;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ReportDraft {
    /// Final report on the topic in Markdown
    #[serde(default)]
    pub report_markdown: String,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ExactAnswer {
    /// The final answer, make it short and concise, just the answer, no other text
    #[serde(default)]
    pub exact_answer: String,
}

/// Render the trailing sources section, one bullet per URL in input order.
pub fn sources_section(visited_urls: &[String]) -> String {
    let bullets = visited_urls
        .iter()
        .map(|url| format!("- {}", url))
        .collect::<Vec<_>>()
        .join("\n");
    format!("\n\n## Sources\n\n{}", bullets)
}

#[derive(Clone)]
pub struct Synthesizer {
    llm: Arc<dyn LLMClient>,
    trimmer: Arc<PromptTrimmer>,
    context_token_limit: usize,
}

impl Synthesizer {
    pub fn new(
        llm: Arc<dyn LLMClient>,
        trimmer: Arc<PromptTrimmer>,
        context_token_limit: usize,
    ) -> Self {
        Self {
            llm,
            trimmer,
            context_token_limit,
        }
    }

    /// Long-form markdown report followed by a `## Sources` section.
    pub async fn write_report(
        &self,
        topic: &str,
        learnings: &[String],
        visited_urls: &[String],
    ) -> String {
        let prompt = self
            .trimmer
            .trim(&prompts::report_prompt(topic, learnings), self.context_token_limit);

        let draft: ReportDraft =
            structured::generate(self.llm.as_ref(), &prompts::system_prompt(), &prompt).await;
        if draft.report_markdown.is_empty() {
            tracing::warn!("Report body is empty");
        }

        format!("{}{}", draft.report_markdown, sources_section(visited_urls))
    }

    /// Short, format-matching answer; empty when the model call fails.
    pub async fn write_answer(&self, topic: &str, learnings: &[String]) -> String {
        let prompt = self
            .trimmer
            .trim(&prompts::answer_prompt(topic, learnings), self.context_token_limit);

        let answer: ExactAnswer =
            structured::generate(self.llm.as_ref(), &prompts::system_prompt(), &prompt).await;
        answer.exact_answer
    }
}
