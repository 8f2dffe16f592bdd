//! # Synthesizer
//!
//! Merges every finding into one structured report and revises reports
//! against critique. The requested sections are an instruction to the
//! model; nothing checks that they come back.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::Synthesizer;
use crate::error::AgentResult;
use crate::llm::CompletionService;
use crate::model::{ResearchResultSet, Style};

const REPORT_MAX_TOKENS: u64 = 700;

fn synthesis_prompt(topic: &str, findings: &ResearchResultSet, style: Style) -> String {
    format!(
        "You are a research synthesis agent. Write in a {style} style. \
         Given the main topic '{topic}' and the following findings from multiple researchers, \
         merge the findings, highlight consensus and conflicting results, and produce a final \
         structured report with:\n\
         - Executive Summary (≤150 words)\n\
         - Key Insights by Subtopic\n\
         - Conflicts or Gaps in Literature\n\
         - Citations & Resource List\n\n\
         Findings:\n{findings}",
        style = style,
        topic = topic,
        findings = findings.render_for_synthesis()
    )
}

fn refine_prompt(report: &str, critique: &str, style: Style) -> String {
    format!(
        "Revise the following report based on this critique: '{critique}'. \
         Write in a {style} style. Improve factual accuracy, clarity, and coherence. \
         Here is the report:\n\n{report}",
        critique = critique,
        style = style,
        report = report
    )
}

// =============================================================================
// LLM SYNTHESIZER
// =============================================================================
/// Writes and revises reports through the completion service. Style is an
/// instruction in the prompt only.
pub struct LlmSynthesizer {
    llm: Arc<dyn CompletionService>,
    temperature: f64,
}

impl LlmSynthesizer {
    pub fn new(llm: Arc<dyn CompletionService>, temperature: f64) -> Self {
        Self { llm, temperature }
    }
}

#[async_trait]
impl Synthesizer for LlmSynthesizer {
    async fn synthesize(
        &self,
        topic: &str,
        findings: &ResearchResultSet,
        style: Style,
    ) -> AgentResult<String> {
        info!(topic = %topic, findings = findings.len(), style = %style, "Synthesizing report");
        self.llm
            .complete(
                &synthesis_prompt(topic, findings, style),
                REPORT_MAX_TOKENS,
                self.temperature,
            )
            .await
    }

    async fn refine(&self, report: &str, critique: &str, style: Style) -> AgentResult<String> {
        info!(style = %style, "Refining report against critique");
        self.llm
            .complete(
                &refine_prompt(report, critique, style),
                REPORT_MAX_TOKENS,
                self.temperature,
            )
            .await
    }
}
