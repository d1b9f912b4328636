//! deep-research CLI entry point
//!
//! Resolves configuration and credentials, gathers any missing inputs, runs the
//! recursive research, then writes and prints a report or answer.

use anyhow::{bail, Context};
use deep_research::{
    cli::{output::Output, prompt, save_document, Cli, OutputKind},
    research::{feedback, prompts},
    utils::{toml_config::env_lookup, trim::PromptTrimmer},
    FirecrawlClient, FirecrawlOptions, LLMClient, LLMClientFactory, ResearchConfig,
    ResearchCoordinator, ResearchOptions, Synthesizer,
};
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Exit status for configuration failures (no provider, missing keys, bad config file).
const CONFIG_EXIT_CODE: i32 = 2;

/// Everything resolved before research may start.
struct Session {
    config: ResearchConfig,
    llm: Arc<dyn LLMClient>,
    coordinator: ResearchCoordinator,
    synthesizer: Synthesizer,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    let session = match prepare(&cli) {
        Ok(session) => session,
        Err(e) if e.is_configuration() => {
            output.configuration_error(&e.to_string());
            std::process::exit(CONFIG_EXIT_CODE);
        }
        Err(e) => {
            output.error(&e.to_string());
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli, session, &output).await {
        output.error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn init_tracing(cli: &Cli, log_level: &str) {
    let default_level = if cli.verbose { "debug" } else { log_level };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let text_layer = (!cli.json_logs).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });
    let json_layer = cli.json_logs.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .init();
}

/// Load configuration and build every collaborator.
fn prepare(cli: &Cli) -> deep_research::Result<Session> {
    let config = ResearchConfig::discover(cli.config.as_deref())?;
    init_tracing(cli, &config.log_level);

    let provider = config.resolve_provider(env_lookup)?;
    tracing::info!(provider = provider.name(), model = provider.model(), "Using LLM provider");
    let llm = LLMClientFactory::new(provider).create_default()?;

    let search = FirecrawlClient::new(FirecrawlOptions {
        api_key: config.search_api_key(env_lookup)?,
        base_url: config.search.base_url.clone(),
        concurrency_limit: config.search.concurrency_limit,
        timeout: Duration::from_secs(config.search.timeout_secs),
    })?;

    let trimmer = Arc::new(PromptTrimmer::new()?);
    let options = ResearchOptions::from_config(&config);
    let synthesizer = Synthesizer::new(llm.clone(), trimmer.clone(), options.context_token_limit);
    let coordinator = ResearchCoordinator::new(llm.clone(), Arc::new(search), trimmer, options);

    Ok(Session {
        config,
        llm,
        coordinator,
        synthesizer,
    })
}

async fn run(cli: Cli, session: Session, output: &Output) -> anyhow::Result<()> {
    let interactive = !cli.non_interactive && std::io::stdin().is_terminal();
    let settings = &session.config.research;

    let topic = match cli.topic() {
        Some(topic) => topic,
        None if interactive => prompt::ask_topic()?,
        None => bail!("No research topic given; pass it as an argument or run in a terminal"),
    };
    let breadth = match cli.breadth {
        Some(breadth) => breadth as usize,
        None if interactive => {
            prompt::ask_number("Research breadth (recommended 2-10)", settings.breadth)?
        }
        None => settings.breadth,
    };
    let depth = match cli.depth {
        Some(depth) => depth as usize,
        None if interactive => prompt::ask_number("Research depth (recommended 1-5)", settings.depth)?,
        None => settings.depth,
    };
    let mode = match cli.mode {
        Some(mode) => mode,
        None if interactive => prompt::ask_output_kind()?,
        None => OutputKind::Report,
    };

    output.banner();
    output.kv("Model", session.llm.model_name());
    output.kv("Breadth", &breadth.to_string());
    output.kv("Depth", &depth.to_string());

    let query = if mode == OutputKind::Report && interactive && !cli.no_clarify {
        let questions = feedback::generate_feedback(
            session.llm.as_ref(),
            &topic,
            feedback::DEFAULT_QUESTION_COUNT,
        )
        .await;

        if questions.is_empty() {
            topic.clone()
        } else {
            output.header("To better understand your research needs, please answer these follow-up questions");
            let answers = prompt::ask_answers(&questions)?;
            prompts::combined_query(&topic, &questions, &answers)
        }
    } else {
        topic.clone()
    };

    output.info("Researching your topic...");
    let result = session
        .coordinator
        .research(&query, breadth, depth)
        .await
        .context("Research failed")?;

    output.header(&format!("Learnings ({})", result.learnings.len()));
    for learning in &result.learnings {
        output.list_item(learning);
    }
    output.header(&format!("Visited URLs ({})", result.visited_urls.len()));
    for url in &result.visited_urls {
        output.list_item(url);
    }
    if result.learnings.is_empty() {
        output.warning("No learnings were gathered; the output will be thin");
    }

    let body = match mode {
        OutputKind::Report => {
            output.info("Writing final report...");
            session
                .synthesizer
                .write_report(&query, &result.learnings, &result.visited_urls)
                .await
        }
        OutputKind::Answer => {
            output.info("Writing final answer...");
            session
                .synthesizer
                .write_answer(&query, &result.learnings)
                .await
        }
    };

    let output_dir = cli
        .output_dir
        .as_deref()
        .unwrap_or(settings.output_dir.as_path());
    let path = save_document(output_dir, mode, &body)
        .with_context(|| format!("Failed to save output to {}", output_dir.display()))?;

    output.document(&body);
    output.saved(&path);

    Ok(())
}
