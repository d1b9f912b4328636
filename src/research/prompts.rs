//! Prompt text for every research call.

use chrono::Local;

/// System prompt shared by all research calls, stamped with the current time.
pub fn system_prompt() -> String {
    let now = Local::now().to_rfc3339();
    format!(
        r#"You are an expert researcher with deep analytical capabilities. Today is {now}.

## Core Principles
- Treat the user as a highly experienced analyst who values accuracy, depth, and thoroughness
- Mistakes erode trust - prioritize accuracy and comprehensive analysis over speed
- Value evidence-based arguments over authority; evaluate sources based on quality, not reputation
- Consider innovative approaches, emerging technologies, and contrarian perspectives alongside conventional wisdom
- Provide detailed, nuanced explanations suitable for expert-level understanding

## Research Methodology
- When researching topics beyond your knowledge cutoff, accept current information as accurate when presented
- Structure your analysis logically with clear sections and subsections
- Cross-reference multiple perspectives and identify potential biases or limitations
- Distinguish between established facts, reasonable inferences, and speculative conclusions
- Highlight uncertainty and confidence levels in your assessments
- Proactively identify research gaps and suggest additional investigation areas

## Response Guidelines
- Be highly organized with clear headings, bullet points, and logical flow
- Provide comprehensive detail - assume the user can handle complex information
- Suggest novel solutions and approaches the user may not have considered
- Anticipate follow-up questions and provide context for deeper exploration
- Include relevant technical details, methodologies, and implementation considerations
- When making predictions or speculations, clearly flag them as such with confidence levels

## Analysis Standards
- Synthesize information from multiple angles and disciplines
- Identify patterns, trends, and underlying principles
- Evaluate strengths and weaknesses of different approaches
- Consider practical implications and real-world constraints
- Provide actionable insights and concrete recommendations where appropriate"#
    )
}

pub fn serp_queries_prompt(query: &str, num_queries: usize, learnings: &[String]) -> String {
    let mut prompt = format!(
        "Given the following prompt from the user, generate a list of SERP queries to research the topic. \
         Return a maximum of {num_queries} queries, but feel free to return less if the original prompt is clear. \
         Make sure each query is unique and not similar to each other: <prompt>{query}</prompt>"
    );

    if !learnings.is_empty() {
        prompt.push_str(&format!(
            "\n\nHere are some learnings from previous research, use them to generate more specific queries: {}",
            learnings.join(" ")
        ));
    }

    prompt
}

pub fn serp_digest_prompt(
    query: &str,
    contents: &[String],
    num_learnings: usize,
    num_follow_ups: usize,
) -> String {
    let contents_text = contents
        .iter()
        .map(|content| format!("<content>\n{}\n</content>", content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Given the following contents from a SERP search for the query <query>{query}</query>, generate a list of learnings from the contents. \
         Return a maximum of {num_learnings} learnings, but feel free to return less if the contents are clear. \
         Make sure each learning is unique and not similar to each other. \
         The learnings should be concise and to the point, as detailed and information dense as possible. \
         Make sure to include any entities like people, places, companies, products, things, etc in the learnings, \
         as well as any exact metrics, numbers, or dates. The learnings will be used to research the topic further. \
         Also return a maximum of {num_follow_ups} follow-up questions to research the topic further.\n\n\
         <contents>{contents_text}</contents>"
    )
}

fn learnings_block(learnings: &[String]) -> String {
    learnings
        .iter()
        .map(|learning| format!("<learning>\n{}\n</learning>", learning))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn report_prompt(prompt: &str, learnings: &[String]) -> String {
    format!(
        "Given the following prompt from the user, write a final report on the topic using the learnings from research. \
         Make it as detailed as possible, aim for 3 or more pages, include ALL the learnings from research:\n\n\
         <prompt>{prompt}</prompt>\n\n\
         Here are all the learnings from previous research:\n\n\
         <learnings>\n{}\n</learnings>",
        learnings_block(learnings)
    )
}

pub fn answer_prompt(prompt: &str, learnings: &[String]) -> String {
    format!(
        "Given the following prompt from the user, write a final answer on the topic using the learnings from research. \
         Follow the format specified in the prompt. Do not yap or babble or include any other text than the answer besides the format specified in the prompt. \
         Keep the answer as concise as possible - usually it should be just a few words or maximum a sentence. \
         Try to follow the format specified in the prompt (for example, if the prompt is using Latex, the answer should be in Latex. \
         If the prompt gives multiple answer choices, the answer should be one of the choices).\n\n\
         <prompt>{prompt}</prompt>\n\n\
         Here are all the learnings from research on the topic that you can use to help answer the prompt:\n\n\
         <learnings>\n{}\n</learnings>",
        learnings_block(learnings)
    )
}

pub fn feedback_prompt(query: &str, num_questions: usize) -> String {
    format!(
        "Given the following query from the user, ask some follow up questions to clarify the research direction. \
         Return a maximum of {num_questions} questions, but feel free to return less if the original query is clear: <query>{query}</query>"
    )
}

/// Query for the next recursion level: the branch's goal plus its follow-ups.
pub fn next_query(research_goal: &str, follow_up_questions: &[String]) -> String {
    format!(
        "Previous research goal: {}\nFollow-up research directions: {}",
        research_goal,
        follow_up_questions.join(" ")
    )
    .trim()
    .to_string()
}

/// Fold the user's answers to clarifying questions into the research query.
pub fn combined_query(topic: &str, questions: &[String], answers: &[String]) -> String {
    let qa_pairs = questions
        .iter()
        .zip(answers)
        .map(|(q, a)| format!("Q: {}\nA: {}", q, a))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Initial Query: {}\nFollow-up Questions and Answers:\n{}",
        topic, qa_pairs
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_is_dated() {
        let prompt = system_prompt();
        assert!(prompt.contains("Today is"));
        assert!(prompt.contains(&Local::now().format("%Y-%m-%d").to_string()));
    }

    #[test]
    fn test_system_prompt_sections() {
        let prompt = system_prompt();
        for section in [
            "## Core Principles",
            "## Research Methodology",
            "## Response Guidelines",
            "## Analysis Standards",
        ] {
            assert!(prompt.contains(section), "missing {}", section);
        }
        assert!(prompt.contains("implementation considerations"));
        assert!(prompt.ends_with("concrete recommendations where appropriate"));
    }

    #[test]
    fn test_serp_queries_prompt_mentions_prior_learnings() {
        let without = serp_queries_prompt("solid state batteries", 4, &[]);
        assert!(without.contains("maximum of 4 queries"));
        assert!(!without.contains("learnings from previous research"));

        let with = serp_queries_prompt(
            "solid state batteries",
            2,
            &["Toyota targets 2027".to_string()],
        );
        assert!(with.contains("learnings from previous research"));
        assert!(with.contains("Toyota targets 2027"));
    }

    #[test]
    fn test_digest_prompt_wraps_each_content() {
        let prompt = serp_digest_prompt("q", &["one".to_string(), "two".to_string()], 3, 2);
        assert_eq!(prompt.matches("<content>").count(), 2);
        assert!(prompt.contains("maximum of 3 learnings"));
        assert!(prompt.contains("maximum of 2 follow-up questions"));
    }

    #[test]
    fn test_next_query_joins_follow_ups() {
        let next = next_query(
            "Find production dates",
            &["When?".to_string(), "Where?".to_string()],
        );
        assert_eq!(
            next,
            "Previous research goal: Find production dates\nFollow-up research directions: When? Where?"
        );
    }

    #[test]
    fn test_combined_query_pairs_questions_and_answers() {
        let combined = combined_query(
            "EV batteries",
            &["Which chemistry?".to_string()],
            &["LFP".to_string()],
        );
        assert!(combined.starts_with("Initial Query: EV batteries"));
        assert!(combined.contains("Q: Which chemistry?\nA: LFP"));
    }

    #[test]
    fn test_report_and_answer_prompts_include_learnings() {
        let learnings = vec!["fact one".to_string()];
        assert!(report_prompt("topic", &learnings).contains("<learning>\nfact one\n</learning>"));
        assert!(answer_prompt("topic", &learnings).contains("<prompt>topic</prompt>"));
    }
}
