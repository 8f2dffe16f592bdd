//! # Multi-Agent Research CLI
//!
//! Command-line front end for the research pipeline.
//!
//! ## Quick Start
//! ```bash
//! cargo run -- "Impact of AI on healthcare" --style business --markdown report.md
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use multi_agent_research::report::MARKDOWN_SECTIONS;
use multi_agent_research::{Config, FailurePolicy, OrchestrationResult, Orchestrator, Style};

// =============================================================================
// CLI ARGUMENTS
// =============================================================================
#[derive(Parser, Debug)]
#[command(
    name = "multi-agent-research",
    version,
    about = "Splits a topic, researches sub-topics in parallel, and writes a critiqued report",
    long_about = r#"
Multi-Agent Research - a small team of LLM agents for literature overviews.

It will:
  1. Split the topic into 2-3 narrower sub-topics
  2. Search Google Scholar (SerpAPI) and summarize each sub-topic in parallel
  3. Synthesize one report in the requested style
  4. Have a critic review it and refine the report a bounded number of times

PREREQUISITES:
  OPENAI_API_KEY and SERPAPI_API_KEY in the environment or a .env file

EXAMPLES:
  multi-agent-research "Impact of AI on healthcare"
  multi-agent-research --style layperson --max-retries 1 "CRISPR in agriculture"
  multi-agent-research --markdown report.md --json report.json "Quantum error correction"
"#
)]
struct Args {
    /// The main research topic
    #[arg(value_name = "TOPIC")]
    topic: String,

    /// Report style
    #[arg(short = 's', long = "style", value_enum)]
    style: Option<Style>,

    /// Maximum critique-driven refinements (overrides MAX_RETRIES)
    #[arg(short = 'r', long = "max-retries")]
    max_retries: Option<usize>,

    /// Chat model to use (overrides OPENAI_MODEL env var)
    #[arg(short = 'm', long = "model", env = "OPENAI_MODEL")]
    model: Option<String>,

    /// Abort if any sub-topic's research fails instead of continuing with the rest
    #[arg(long = "fail-fast", default_value = "false")]
    fail_fast: bool,

    /// Write the report as Markdown to this path
    #[arg(long = "markdown", value_name = "PATH")]
    markdown: Option<PathBuf>,

    /// Write the report as JSON to this path
    #[arg(long = "json", value_name = "PATH")]
    json: Option<PathBuf>,

    /// Enable verbose/debug logging (overrides RUST_LOG)
    #[arg(short = 'v', long = "verbose", default_value = "false")]
    verbose: bool,
}

// =============================================================================
// MAIN FUNCTION
// =============================================================================
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Loaded first so RUST_LOG from `.env` reaches the log filter
    let mut config = Config::from_env()?;

    init_logging(&config.log_level, args.verbose)?;

    info!("Multi-agent research starting up...");

    if let Some(model) = args.model {
        info!(model = %model, "Using model from command line");
        config.model = model;
    }
    if let Some(max_retries) = args.max_retries {
        config.max_retries = max_retries;
    }
    if let Some(style) = args.style {
        config.style = style;
    }

    config.validate()?;

    for key in config.missing_credentials() {
        warn!(key, "Credential not set; calls that need it will fail");
    }

    info!(
        model = %config.model,
        engine = %config.search_engine,
        style = %config.style,
        max_retries = config.max_retries,
        "Configuration loaded"
    );

    let policy = if args.fail_fast {
        FailurePolicy::FailFast
    } else {
        FailurePolicy::Partial
    };
    let orchestrator = Orchestrator::from_config(&config).with_failure_policy(policy);

    match orchestrator
        .orchestrate(&args.topic, config.style, config.max_retries)
        .await
    {
        Ok(result) => {
            print_result(&result);

            if let Some(path) = &args.markdown {
                result.write_markdown(path)?;
            }
            if let Some(path) = &args.json {
                result.write_json(path)?;
            }

            info!("Research completed successfully");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Research failed");

            eprintln!("\nNo report available.");
            eprintln!("The {} stage failed: {}", e.stage, e.source);

            Err(e.into())
        }
    }
}

fn print_result(result: &OrchestrationResult) {
    let sections = [
        &result.summary,
        &result.findings,
        &result.citations,
        &result.critic_review,
    ];

    for (title, body) in MARKDOWN_SECTIONS.iter().zip(sections) {
        println!("\n{}", "=".repeat(60));
        println!("{}", title.to_uppercase());
        println!("{}\n", "=".repeat(60));
        println!("{}", body);
    }
}

// =============================================================================
// LOGGING INITIALIZATION
// =============================================================================
/// Install the global tracing subscriber. Logs go to stderr so stdout
/// carries only the report.
fn init_logging(log_level: &str, verbose: bool) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(log_level, verbose)?)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set logging subscriber: {}", e))?;

    Ok(())
}

/// Build the log filter from a `RUST_LOG`-style directive string.
///
/// # Rust Concept: `EnvFilter`
///
/// Directives such as `warn,multi_agent_research=debug` set a level per
/// module. `--verbose` replaces them with `debug` for everything.
fn log_filter(log_level: &str, verbose: bool) -> Result<EnvFilter> {
    if verbose {
        return Ok(EnvFilter::new("debug"));
    }
    EnvFilter::try_new(log_level)
        .with_context(|| format!("RUST_LOG is not a valid log filter: {}", log_level))
}
