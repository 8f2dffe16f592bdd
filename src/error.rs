//! # Error Module
//!
//! Typed errors for every layer of the research pipeline.
//!
//! Component-level failures (`AgentError`) are never caught where they occur;
//! they bubble up to the orchestrator, which tags them with the [`Stage`]
//! that was running and hands the caller an [`OrchestrationError`].

use std::fmt;
use std::time::Duration;

use thiserror::Error;

// =============================================================================
// SEARCH ERRORS
// =============================================================================
/// Errors returned by the scholarly search service.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search request timed out")]
    Timeout,

    #[error("Unauthorized - check SERPAPI_API_KEY")]
    Unauthorized,

    #[error("Rate limited by search provider, please wait")]
    RateLimited,

    #[error("Search provider error ({0}): {1}")]
    ServerError(u16, String),

    #[error("HTTP error ({0}): {1}")]
    HttpError(u16, String),

    #[error("Search API reported an error: {0}")]
    Api(String),

    #[error("Failed to parse search response: {0}")]
    ParseError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

// =============================================================================
// AGENT ERRORS
// =============================================================================
/// Errors a single agent call can produce.
///
/// # Rust Concept: `#[from]`
///
/// `#[from]` derives `From<SearchError> for AgentError`, so `?` converts a
/// search failure into an agent failure without any explicit mapping.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("LLM completion failed: {0}")]
    Llm(String),

    #[error("LLM call timed out after {0:?}")]
    LlmTimeout(Duration),

    #[error("Search failed: {0}")]
    Search(#[from] SearchError),

    #[error("All {0} research workers failed; first error: {1}")]
    AllWorkersFailed(usize, String),
}

// =============================================================================
// ORCHESTRATION ERRORS
// =============================================================================
/// The pipeline stage that was running when a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Split,
    Research,
    Synthesize,
    Critique,
    Refine,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Split => "split",
            Stage::Research => "research",
            Stage::Synthesize => "synthesize",
            Stage::Critique => "critique",
            Stage::Refine => "refine",
        };
        f.write_str(name)
    }
}

/// Failure of a whole orchestration run, carrying the stage that failed.
#[derive(Error, Debug)]
#[error("Orchestration failed during {stage} stage: {source}")]
pub struct OrchestrationError {
    pub stage: Stage,
    #[source]
    pub source: AgentError,
}

impl OrchestrationError {
    pub fn new(stage: Stage, source: AgentError) -> Self {
        Self { stage, source }
    }
}

/// Result alias used by agents and services.
pub type AgentResult<T> = Result<T, AgentError>;
