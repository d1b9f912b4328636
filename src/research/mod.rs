//! Recursive deep research
//!
//! A topic is expanded into a tree of web searches. Each level asks the model
//! for a handful of queries, runs every query as an independent branch
//! (search, then distill the pages into learnings), and sends each branch one
//! level deeper with a narrower breadth and a query built from its follow-up
//! questions. Findings from all branches are unioned into a single result.
//!
//! # Architecture
//!
//! - [`planner::QueryPlanner`] - topic to bounded list of search queries
//! - [`distiller::ResultDistiller`] - page bodies to learnings and follow-ups
//! - [`coordinator::ResearchCoordinator`] - the recursion, fan-out and merge
//! - [`synthesis::Synthesizer`] - final report or exact answer
//! - [`feedback::generate_feedback`] - clarifying questions before a run
//!
//! # Usage
//!
//! ```ignore
//! use deep_research::research::{ResearchCoordinator, ResearchOptions};
//!
//! let coordinator = ResearchCoordinator::new(llm, search, trimmer, ResearchOptions::default());
//! let result = coordinator.research("State of solid-state batteries", 4, 2).await?;
//!
//! for learning in &result.learnings {
//!     println!("- {}", learning);
//! }
//! ```

/// Recursive research orchestration.
pub mod coordinator;
pub mod distiller;
pub mod feedback;
pub mod planner;
pub mod prompts;
pub mod synthesis;

pub use coordinator::{ResearchCoordinator, ResearchOptions};
pub use distiller::ResultDistiller;
pub use planner::QueryPlanner;
pub use synthesis::Synthesizer;
