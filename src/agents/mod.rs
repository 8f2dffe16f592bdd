//! # Agents
//!
//! The four roles of the pipeline. Each role is a trait so the orchestrator
//! can be driven by fakes in tests, and each has one LLM-backed
//! implementation that receives its services through its constructor.

use async_trait::async_trait;

use crate::error::AgentResult;
use crate::model::{ResearchFinding, ResearchResultSet, Style};

pub mod critic;
pub mod researcher;
pub mod splitter;
pub mod synthesizer;

pub use critic::{flags_issues, LlmCritic, TRIGGER_KEYWORDS};
pub use researcher::ScholarResearcher;
pub use splitter::LlmSplitter;
pub use synthesizer::LlmSynthesizer;

/// Turns a topic into narrower sub-topics.
///
/// # Rust Concept: `Send + Sync` supertraits
///
/// Every agent trait requires `Send + Sync` so an `Arc<dyn ...>` can be
/// used from concurrently running research workers and spawned tasks.
#[async_trait]
pub trait TopicSplitter: Send + Sync {
    async fn split(&self, topic: &str) -> AgentResult<Vec<String>>;
}

/// Researches one sub-topic.
#[async_trait]
pub trait SubtopicResearcher: Send + Sync {
    async fn research(&self, subtopic: &str) -> AgentResult<ResearchFinding>;
}

/// Writes and revises the combined report.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(
        &self,
        topic: &str,
        findings: &ResearchResultSet,
        style: Style,
    ) -> AgentResult<String>;

    /// Produce a revised report that addresses `critique`.
    async fn refine(&self, report: &str, critique: &str, style: Style) -> AgentResult<String>;
}

/// Reviews a report and answers with free-text critique.
#[async_trait]
pub trait Critic: Send + Sync {
    async fn review(&self, report: &str) -> AgentResult<String>;
}
