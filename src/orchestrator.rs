//! # Orchestrator
//!
//! Drives the pipeline:
//!
//! ```text
//! Split -> Research -> Synthesize -> Critique -> (Refine -> Critique)* -> Done
//! ```
//!
//! Only the research stage runs concurrently. The refine loop stops as soon
//! as a review flags no issues, and after `max_retries` refinements in any
//! case, so the final report may still carry flagged issues.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::agents::{
    flags_issues, Critic, LlmCritic, LlmSplitter, LlmSynthesizer, ScholarResearcher,
    SubtopicResearcher, Synthesizer, TopicSplitter,
};
use crate::config::Config;
use crate::error::{OrchestrationError, Stage};
use crate::fanout::{fan_out, FailurePolicy};
use crate::llm::{CompletionService, OpenAiCompletion};
use crate::model::Style;
use crate::report::OrchestrationResult;
use crate::search::{SearchService, SerpApiSearch};

// =============================================================================
// ORCHESTRATOR
// =============================================================================
/// Owns one instance of every agent and runs them in sequence.
///
/// # Rust Concept: Trait Objects
///
/// `Arc<dyn TopicSplitter>` lets the orchestrator hold any splitter, LLM
/// backed or scripted, behind one type. `Arc` makes the agents cheap to
/// share if the orchestrator itself is shared across tasks.
pub struct Orchestrator {
    splitter: Arc<dyn TopicSplitter>,
    researcher: Arc<dyn SubtopicResearcher>,
    synthesizer: Arc<dyn Synthesizer>,
    critic: Arc<dyn Critic>,
    failure_policy: FailurePolicy,
}

impl Orchestrator {
    /// Build an orchestrator from explicit agents, with the default
    /// [`FailurePolicy::Partial`].
    pub fn new(
        splitter: Arc<dyn TopicSplitter>,
        researcher: Arc<dyn SubtopicResearcher>,
        synthesizer: Arc<dyn Synthesizer>,
        critic: Arc<dyn Critic>,
    ) -> Self {
        Self {
            splitter,
            researcher,
            synthesizer,
            critic,
            failure_policy: FailurePolicy::default(),
        }
    }

    /// Wire the production agents: OpenAI via rig for every LLM call and
    /// SerpAPI for search. Credentials come from `config` only.
    ///
    /// # Rust Concept: Sharing with `Arc`
    ///
    /// All four agents use the same completion service. `llm.clone()`
    /// copies the pointer and bumps a reference count; the client itself
    /// is built once.
    pub fn from_config(config: &Config) -> Self {
        let timeout = Duration::from_secs(config.request_timeout_secs);

        let llm: Arc<dyn CompletionService> = Arc::new(
            OpenAiCompletion::new(
                config.openai_api_key.clone().unwrap_or_default(),
                config.model.clone(),
            )
            .with_timeout(timeout),
        );

        let search: Arc<dyn SearchService> = Arc::new(
            SerpApiSearch::new(config.serpapi_api_key.clone().unwrap_or_default())
                .with_base_url(config.serpapi_base_url.clone())
                .with_engine(config.search_engine.clone())
                .with_timeout(timeout),
        );

        let temperature = config.temperature;
        Self::new(
            Arc::new(LlmSplitter::new(llm.clone(), temperature)),
            Arc::new(
                ScholarResearcher::new(search, llm.clone(), temperature)
                    .with_max_results(config.max_search_results),
            ),
            Arc::new(LlmSynthesizer::new(llm.clone(), temperature)),
            Arc::new(LlmCritic::new(llm, temperature)),
        )
    }

    /// Choose how research worker failures are handled.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Run the full pipeline for one topic.
    ///
    /// Every failure is logged here and returned with the stage it came
    /// from; nothing is retried except the critique-driven refine loop.
    pub async fn orchestrate(
        &self,
        topic: &str,
        style: Style,
        max_retries: usize,
    ) -> Result<OrchestrationResult, OrchestrationError> {
        info!(topic = %topic, style = %style, max_retries, "Starting orchestration");

        let result = self.run(topic, style, max_retries).await;
        if let Err(e) = &result {
            error!(stage = %e.stage, error = %e.source, "Orchestration failed");
        }
        result
    }

    async fn run(
        &self,
        topic: &str,
        style: Style,
        max_retries: usize,
    ) -> Result<OrchestrationResult, OrchestrationError> {
        // Split
        let subtopics = self
            .splitter
            .split(topic)
            .await
            .map_err(|e| OrchestrationError::new(Stage::Split, e))?;
        if subtopics.is_empty() {
            warn!(topic = %topic, "Splitter produced no sub-topics");
        }

        // Research
        let findings = fan_out(self.researcher.as_ref(), &subtopics, self.failure_policy)
            .await
            .map_err(|e| OrchestrationError::new(Stage::Research, e))?;

        // Synthesize
        let mut report = self
            .synthesizer
            .synthesize(topic, &findings, style)
            .await
            .map_err(|e| OrchestrationError::new(Stage::Synthesize, e))?;

        // Critique, then refine while issues are flagged. Each refinement is
        // reviewed again, so `review` always describes `report`.
        let mut review = self
            .critic
            .review(&report)
            .await
            .map_err(|e| OrchestrationError::new(Stage::Critique, e))?;

        let mut refinements = 0;
        while refinements < max_retries && flags_issues(&review) {
            info!(round = refinements + 1, max_retries, "Critique flagged issues, refining");

            report = self
                .synthesizer
                .refine(&report, &review, style)
                .await
                .map_err(|e| OrchestrationError::new(Stage::Refine, e))?;

            review = self
                .critic
                .review(&report)
                .await
                .map_err(|e| OrchestrationError::new(Stage::Critique, e))?;

            refinements += 1;
        }

        if flags_issues(&review) {
            warn!(refinements, "Refine budget exhausted with issues still flagged");
        }
        info!(
            subtopics = subtopics.len(),
            findings = findings.len(),
            refinements,
            "Orchestration completed"
        );

        Ok(OrchestrationResult {
            summary: report,
            findings: findings.render_findings(),
            citations: findings.flattened_citations(),
            critic_review: review,
        })
    }
}
