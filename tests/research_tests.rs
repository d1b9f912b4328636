//! Research orchestration tests
//!
//! Drives the recursive coordinator end to end against scripted collaborators
//! and checks termination, call bounds, deduplication and failure isolation.

mod common;

use common::mocks::{MockLLMClient, MockSearch};
use deep_research::research::feedback::generate_feedback;
use deep_research::research::prompts::combined_query;
use deep_research::utils::trim::PromptTrimmer;
use deep_research::{ResearchCoordinator, ResearchOptions, ResearchState, Synthesizer};
use rstest::rstest;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn trimmer() -> Arc<PromptTrimmer> {
    Arc::new(PromptTrimmer::new().expect("tokenizer should load"))
}

fn coordinator(llm: &Arc<MockLLMClient>, search: &Arc<MockSearch>) -> ResearchCoordinator {
    coordinator_with(llm, search, ResearchOptions::default())
}

fn coordinator_with(
    llm: &Arc<MockLLMClient>,
    search: &Arc<MockSearch>,
    options: ResearchOptions,
) -> ResearchCoordinator {
    ResearchCoordinator::new(llm.clone(), search.clone(), trimmer(), options)
}

// ============= Termination and call bounds =============

#[rstest]
#[case(4, 1, 1, 4)]
#[case(4, 2, 5, 12)]
#[case(4, 3, 13, 20)]
#[case(1, 3, 3, 3)]
#[tokio::test]
async fn test_recursion_is_bounded_by_breadth_and_depth(
    #[case] breadth: usize,
    #[case] depth: usize,
    #[case] expected_plans: usize,
    #[case] expected_searches: usize,
) {
    // The model always over-generates; the planner must cut it back to breadth
    let llm = Arc::new(MockLLMClient::new().with_queries_per_plan(10));
    let search = Arc::new(MockSearch::new());

    let result = coordinator(&llm, &search)
        .research("quantum error correction", breadth, depth)
        .await
        .unwrap();

    assert_eq!(llm.plan_calls(), expected_plans);
    assert_eq!(search.calls(), expected_searches);
    assert_eq!(result.visited_urls.len(), expected_searches);
}

#[tokio::test]
async fn test_breadth_four_depth_two_issues_at_most_twelve_searches() {
    let llm = Arc::new(MockLLMClient::new().with_queries_per_plan(4));
    let search = Arc::new(MockSearch::new());

    coordinator(&llm, &search)
        .research("grid-scale storage", 4, 2)
        .await
        .unwrap();

    assert!(search.calls() <= 12);
}

#[tokio::test]
async fn test_deeper_levels_use_follow_up_queries() {
    let llm = Arc::new(MockLLMClient::new().with_queries_per_plan(1));
    let search = Arc::new(MockSearch::new());

    coordinator(&llm, &search)
        .research("grid-scale storage", 2, 2)
        .await
        .unwrap();

    let prompts = llm.prompts();
    let second_plan = prompts
        .iter()
        .filter(|p| p.contains("generate a list of SERP queries"))
        .nth(1)
        .expect("second level should plan");

    assert!(second_plan.contains("Previous research goal: goal 1 #0"));
    assert!(second_plan.contains("Follow-up research directions: What changed recently?"));
    // Breadth 2 halves to 1 follow-up question per distillation
    assert!(!second_plan.contains("Who are the main players?"));
    assert!(second_plan.contains("learned about query 1 #0"));
}

// ============= Terminal and degraded outcomes =============

#[tokio::test]
async fn test_zero_queries_returns_exactly_empty() {
    let llm = Arc::new(MockLLMClient::new().with_queries_per_plan(0));
    let search = Arc::new(MockSearch::new());

    let result = coordinator(&llm, &search)
        .research("an oddly specific topic", 4, 3)
        .await
        .unwrap();

    assert!(result.learnings.is_empty());
    assert!(result.visited_urls.is_empty());
    assert_eq!(llm.plan_calls(), 1);
    assert_eq!(search.calls(), 0);
}

#[tokio::test]
async fn test_zero_queries_returns_prior_unchanged() {
    let llm = Arc::new(MockLLMClient::new().with_queries_per_plan(0));
    let search = Arc::new(MockSearch::new());
    let prior = ResearchState::with_prior(["known fact"], ["https://known.example"]);

    let result = coordinator(&llm, &search)
        .research_with_prior("topic", 4, 2, prior)
        .await
        .unwrap();

    assert_eq!(result.learnings, vec!["known fact"]);
    assert_eq!(result.visited_urls, vec!["https://known.example"]);
}

#[tokio::test]
async fn test_empty_search_results_keep_prior_urls() {
    let llm = Arc::new(MockLLMClient::new());
    let search = Arc::new(MockSearch::empty());
    let prior = ResearchState::with_prior(Vec::<String>::new(), ["https://seed.example"]);

    let result = coordinator(&llm, &search)
        .research_with_prior("topic", 2, 2, prior)
        .await
        .unwrap();

    assert_eq!(result.visited_urls, vec!["https://seed.example"]);
    assert!(result.learnings.is_empty());
    // Nothing to distill, so the model is never asked
    assert_eq!(llm.distill_calls(), 0);
}

#[tokio::test]
async fn test_failing_model_degrades_to_empty_result() {
    let llm = Arc::new(MockLLMClient::failing());
    let search = Arc::new(MockSearch::new());

    let result = coordinator(&llm, &search)
        .research("topic", 4, 2)
        .await
        .unwrap();

    assert!(result.learnings.is_empty());
    assert!(result.visited_urls.is_empty());
    assert_eq!(search.calls(), 0);
}

#[tokio::test]
async fn test_panicking_branch_does_not_affect_siblings() {
    let llm = Arc::new(MockLLMClient::new().with_queries_per_plan(3));
    let search = Arc::new(MockSearch::panicking_on("query 1 #1"));

    let result = coordinator(&llm, &search)
        .research("topic", 3, 1)
        .await
        .unwrap();

    assert_eq!(search.calls(), 3);
    assert_eq!(
        result.visited_urls,
        vec![
            MockSearch::url_for("query 1 #0"),
            MockSearch::url_for("query 1 #2"),
        ]
    );
    assert_eq!(result.learnings.len(), 2);
}

#[tokio::test]
async fn test_expired_deadline_stops_new_branches() {
    let llm = Arc::new(MockLLMClient::new());
    let search = Arc::new(MockSearch::new());
    let options = ResearchOptions {
        deadline: Some(Duration::ZERO),
        ..ResearchOptions::default()
    };

    let result = coordinator_with(&llm, &search, options)
        .research("topic", 4, 2)
        .await
        .unwrap();

    assert_eq!(search.calls(), 0);
    assert!(result.visited_urls.is_empty());
}

// ============= Merging =============

#[tokio::test]
async fn test_identical_learnings_from_branches_collapse() {
    let llm = Arc::new(
        MockLLMClient::new()
            .with_queries_per_plan(2)
            .with_learnings(&["Paris is the capital of France"]),
    );
    let search = Arc::new(MockSearch::new());

    let result = coordinator(&llm, &search)
        .research("capital of France", 2, 1)
        .await
        .unwrap();

    assert_eq!(llm.distill_calls(), 2);
    assert_eq!(result.learnings, vec!["Paris is the capital of France"]);
    assert_eq!(result.visited_urls.len(), 2);
}

#[tokio::test]
async fn test_result_is_deterministic_across_runs() {
    let run = || async {
        let llm = Arc::new(MockLLMClient::new().with_queries_per_plan(4));
        let search = Arc::new(MockSearch::new());
        coordinator(&llm, &search)
            .research("topic", 4, 2)
            .await
            .unwrap()
    };

    assert_eq!(run().await, run().await);
}

#[tokio::test]
async fn test_branches_run_concurrently() {
    let llm = Arc::new(MockLLMClient::new().with_queries_per_plan(4));
    let search = Arc::new(MockSearch::new().with_delay(Duration::from_millis(200)));
    let coordinator = coordinator(&llm, &search);

    let started = Instant::now();
    coordinator.research("topic", 4, 1).await.unwrap();

    // Four sequential searches would take at least 800ms
    assert!(started.elapsed() < Duration::from_millis(700));
    assert_eq!(search.calls(), 4);
}

// ============= Synthesis and clarification =============

#[tokio::test]
async fn test_report_lists_every_source_in_order() {
    let llm = Arc::new(MockLLMClient::new());
    let synthesizer = Synthesizer::new(llm, trimmer(), 128_000);
    let urls = vec![
        "https://b.example/2".to_string(),
        "https://a.example/1".to_string(),
        "https://c.example/3".to_string(),
    ];

    let report = synthesizer
        .write_report("topic", &["fact".to_string()], &urls)
        .await;

    let sources = report
        .split("## Sources\n\n")
        .nth(1)
        .expect("report has a sources section");
    let listed: Vec<&str> = sources.lines().map(|l| l.trim_start_matches("- ")).collect();
    assert_eq!(listed, urls);
    assert!(report.starts_with("# Research Report"));
}

#[tokio::test]
async fn test_answer_from_mock() {
    let synthesizer = Synthesizer::new(Arc::new(MockLLMClient::new()), trimmer(), 128_000);
    let answer = synthesizer
        .write_answer("What is the capital of France?", &[])
        .await;
    assert_eq!(answer, "Paris");

    let failing = Synthesizer::new(Arc::new(MockLLMClient::failing()), trimmer(), 128_000);
    assert_eq!(failing.write_answer("q", &[]).await, "");
}

#[tokio::test]
async fn test_clarifying_questions_feed_the_query() {
    let llm = MockLLMClient::new();
    let questions = generate_feedback(&llm, "heat pumps", 3).await;
    assert_eq!(questions, vec!["Which time frame?", "Which region?"]);

    let answers = vec!["2020-2024".to_string(), "Nordics".to_string()];
    let query = combined_query("heat pumps", &questions, &answers);
    assert_eq!(
        query,
        "Initial Query: heat pumps\nFollow-up Questions and Answers:\n\
         Q: Which time frame?\nA: 2020-2024\nQ: Which region?\nA: Nordics"
    );
}
