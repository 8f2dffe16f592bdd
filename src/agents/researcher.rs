//! # Sub-topic Researcher
//!
//! One scholarly search per sub-topic, then one LLM call that turns the top
//! hits into a TL;DR, key insights and citations.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::SubtopicResearcher;
use crate::error::AgentResult;
use crate::llm::CompletionService;
use crate::model::ResearchFinding;
use crate::search::{SearchHit, SearchService};

const SUMMARY_MAX_TOKENS: u64 = 300;

/// Default number of search hits summarized per sub-topic.
pub const DEFAULT_MAX_RESULTS: usize = 3;

fn summary_prompt(subtopic: &str, hits: &[SearchHit]) -> String {
    let findings = hits
        .iter()
        .map(SearchHit::to_finding_line)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Summarize the following findings for the subtopic '{}'. \
         Provide a TL;DR, key insights, and citations:\n\n{}",
        subtopic, findings
    )
}

// =============================================================================
// SCHOLAR RESEARCHER
// =============================================================================
/// Researches a sub-topic with one search and one summary call.
///
/// # Rust Concept: Dependency Injection
///
/// The search and completion services arrive as trait objects, so the
/// same researcher runs against SerpAPI and OpenAI in production and
/// against in-memory fakes in tests.
pub struct ScholarResearcher {
    search: Arc<dyn SearchService>,
    llm: Arc<dyn CompletionService>,
    max_results: usize,
    temperature: f64,
}

impl ScholarResearcher {
    pub fn new(
        search: Arc<dyn SearchService>,
        llm: Arc<dyn CompletionService>,
        temperature: f64,
    ) -> Self {
        Self {
            search,
            llm,
            max_results: DEFAULT_MAX_RESULTS,
            temperature,
        }
    }

    /// Summarize at most `max_results` hits, in ranking order.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

#[async_trait]
impl SubtopicResearcher for ScholarResearcher {
    async fn research(&self, subtopic: &str) -> AgentResult<ResearchFinding> {
        let mut hits = self.search.search(subtopic).await?;
        hits.truncate(self.max_results);
        debug!(subtopic = %subtopic, hits = hits.len(), "Summarizing search hits");

        let summary = self
            .llm
            .complete(
                &summary_prompt(subtopic, &hits),
                SUMMARY_MAX_TOKENS,
                self.temperature,
            )
            .await?;

        let citations = hits
            .into_iter()
            .map(|hit| hit.link.unwrap_or_default())
            .collect();

        info!(subtopic = %subtopic, "Sub-topic researched");
        Ok(ResearchFinding::new(subtopic, summary, citations))
    }
}
