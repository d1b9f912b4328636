use crate::llm::{structured, LLMClient};
use crate::research::prompts;
use schemars::JsonSchema;
use serde::Deserialize;

/// Number of clarifying questions asked by default.
pub const DEFAULT_QUESTION_COUNT: usize = 3;

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ClarifyingQuestions {
    /// Follow up questions to clarify the research direction
    #[serde(default)]
    pub questions: Vec<String>,
}

/// Ask the model for up to `num_questions` questions that would narrow the topic.
pub async fn generate_feedback(
    llm: &dyn LLMClient,
    topic: &str,
    num_questions: usize,
) -> Vec<String> {
    let prompt = prompts::feedback_prompt(topic, num_questions);
    let response: ClarifyingQuestions =
        structured::generate(llm, &prompts::system_prompt(), &prompt).await;

    response
        .questions
        .into_iter()
        .filter(|q| !q.trim().is_empty())
        .take(num_questions)
        .collect()
}
