//! CLI module for deep-research
//!
//! Provides command-line interface parsing for the `deep-research` binary.
//! Uses clap for argument parsing, owo-colors for colored terminal output and
//! dialoguer for interactive prompts.

pub mod output;
pub mod prompt;

use chrono::Local;
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

/// What to produce once research completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputKind {
    /// Long-form markdown report with sources
    Report,
    /// Short, direct answer
    Answer,
}

impl OutputKind {
    /// File name prefix used when saving output.
    pub fn file_prefix(self) -> &'static str {
        match self {
            OutputKind::Report => "report",
            OutputKind::Answer => "answer",
        }
    }
}

/// deep-research - recursive web research with an LLM
#[derive(Parser, Debug)]
#[command(
    name = "deep-research",
    version,
    about = "Recursive, breadth/depth-bounded web research with an LLM",
    long_about = "Expands a topic into a tree of web searches, extracts learnings from every\n\
                  result set, refines the queries with what it learned, and finally writes a\n\
                  markdown report or a short answer.",
    after_help = "EXAMPLES:\n    \
                  deep-research \"solid-state battery roadmap\"\n    \
                  deep-research --breadth 3 --depth 1 --mode answer \"Who won the 2022 World Cup?\"\n    \
                  deep-research --config research.toml --non-interactive \"fusion startups\"\n\n\
                  ENVIRONMENT:\n    \
                  GEMINI_KEY / OPENAI_KEY     LLM credentials (or configure [provider] in research.toml)\n    \
                  FIRECRAWL_KEY               Web search credentials"
)]
pub struct Cli {
    /// Research topic (prompted for when omitted)
    pub topic: Vec<String>,

    /// Number of queries per research level
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub breadth: Option<u32>,

    /// Number of recursion levels
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub depth: Option<u32>,

    /// Produce a report or a short answer
    #[arg(short, long, value_enum)]
    pub mode: Option<OutputKind>,

    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for saved reports and answers
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Skip clarifying questions before a report
    #[arg(long)]
    pub no_clarify: bool,

    /// Never prompt; use defaults for anything not given
    #[arg(long)]
    pub non_interactive: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Topic words joined into one query, if any were given.
    pub fn topic(&self) -> Option<String> {
        let topic = self.topic.join(" ");
        let topic = topic.trim();
        if topic.is_empty() {
            None
        } else {
            Some(topic.to_string())
        }
    }
}

/// Write `body` to `<dir>/<kind>_<YYYYmmdd_HHMMSS>.md`, creating `dir` if needed.
pub fn save_document(dir: &Path, kind: OutputKind, body: &str) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let file_name = format!(
        "{}_{}.md",
        kind.file_prefix(),
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let path = dir.join(file_name);
    fs::write(&path, body)?;
    Ok(path)
}
