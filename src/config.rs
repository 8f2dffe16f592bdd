//! # Configuration Module
//!
//! Loads the research assistant's settings from a `.env` file and the process
//! environment. Both API credentials live here and are handed to the services
//! that need them when the orchestrator is built; nothing reads the
//! environment after start-up.

use anyhow::{Context, Result};
use std::env;

use crate::model::Style;

// =============================================================================
// CONFIGURATION STRUCT
// =============================================================================
/// Main configuration for the research pipeline.
///
/// # Rust Concept: `Option<String>` for credentials
///
/// The keys are optional rather than required: a run without them still
/// starts, and the service that needs a key fails its own call. Everything
/// else has a usable default, see the `Default` impl below.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI API key (`OPENAI_API_KEY`)
    pub openai_api_key: Option<String>,

    /// SerpAPI key (`SERPAPI_API_KEY`)
    pub serpapi_api_key: Option<String>,

    /// Chat model used by every agent
    pub model: String,

    /// SerpAPI endpoint root; `/search` is appended
    pub serpapi_base_url: String,

    /// SerpAPI engine, scholarly search by default
    pub search_engine: String,

    /// Temperature for LLM responses (0.0 = deterministic, 2.0 = very creative)
    pub temperature: f64,

    /// Number of search hits summarized per sub-topic
    pub max_search_results: usize,

    /// Upper bound on critique-driven refinements
    pub max_retries: usize,

    /// Report style used when the caller does not pick one
    pub style: Style,

    /// Per-call timeout in seconds for search and LLM calls. `0` disables
    /// the LLM timeout; the HTTP client always keeps one.
    pub request_timeout_secs: u64,

    /// Log filter directives (`RUST_LOG`), e.g. `info` or
    /// `warn,multi_agent_research=debug`
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            serpapi_api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            serpapi_base_url: "https://serpapi.com".to_string(),
            search_engine: "google_scholar".to_string(),
            temperature: 0.7,
            max_search_results: 3,
            max_retries: 2,
            style: Style::Academic,
            request_timeout_secs: 60,
            log_level: "info".to_string(),
        }
    }
}

// =============================================================================
// CONFIGURATION LOADING
// =============================================================================
impl Config {
    /// Load configuration from `.env` and environment variables.
    ///
    /// A missing `.env` file is not an error. Unset variables keep their
    /// defaults; set-but-unparseable numeric variables are.
    ///
    /// # Rust Concept: `.context()`
    ///
    /// anyhow's `Context` trait wraps a low-level `ParseIntError` with a
    /// message naming the variable, and `?` returns it to `main`.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = Config::default();

        if let Ok(val) = env::var("OPENAI_API_KEY") {
            config.openai_api_key = Some(val);
        }

        if let Ok(val) = env::var("SERPAPI_API_KEY") {
            config.serpapi_api_key = Some(val);
        }

        if let Ok(val) = env::var("OPENAI_MODEL") {
            config.model = val;
        }

        if let Ok(val) = env::var("SERPAPI_BASE_URL") {
            config.serpapi_base_url = val;
        }

        if let Ok(val) = env::var("SEARCH_ENGINE") {
            config.search_engine = val;
        }

        if let Ok(val) = env::var("TEMPERATURE") {
            config.temperature = val
                .parse()
                .context("TEMPERATURE must be a valid floating-point number (e.g., 0.7)")?;
        }

        if let Ok(val) = env::var("MAX_SEARCH_RESULTS") {
            config.max_search_results = val
                .parse()
                .context("MAX_SEARCH_RESULTS must be a valid positive integer")?;
        }

        if let Ok(val) = env::var("MAX_RETRIES") {
            config.max_retries = val
                .parse()
                .context("MAX_RETRIES must be a non-negative integer")?;
        }

        if let Ok(val) = env::var("REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = val
                .parse()
                .context("REQUEST_TIMEOUT_SECS must be a non-negative integer")?;
        }

        if let Ok(val) = env::var("RUST_LOG") {
            config.log_level = val;
        }

        Ok(config)
    }

    /// Validate value ranges before any agent runs.
    ///
    /// Credentials are not checked here. A missing key surfaces
    /// as a failed call inside the stage that needs it.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            anyhow::bail!(
                "Temperature must be between 0.0 and 2.0, got: {}",
                self.temperature
            );
        }

        if self.max_search_results == 0 {
            anyhow::bail!("MAX_SEARCH_RESULTS must be at least 1");
        }

        if self.model.is_empty() {
            anyhow::bail!("OPENAI_MODEL cannot be empty");
        }

        Ok(())
    }

    /// Names of the credentials that are not configured. An empty string
    /// counts as missing.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.openai_api_key.as_deref().map_or(true, str::is_empty) {
            missing.push("OPENAI_API_KEY");
        }
        if self.serpapi_api_key.as_deref().map_or(true, str::is_empty) {
            missing.push("SERPAPI_API_KEY");
        }
        missing
    }
}
