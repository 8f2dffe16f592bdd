//! # Report Module
//!
//! The pipeline's terminal output and its two export formats.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Section headings of the Markdown export, in order.
pub const MARKDOWN_SECTIONS: [&str; 4] = [
    "Overall Summary",
    "Per-Researcher Findings",
    "Sources / Citations",
    "Critic Agent Review",
];

/// Final output of one orchestration run.
///
/// `critic_review` is always the review of `summary` as returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestrationResult {
    /// The final (possibly refined) report
    pub summary: String,
    /// Per-sub-topic summaries as text
    pub findings: String,
    /// Every citation, one per line
    pub citations: String,
    /// Critique of the final report
    pub critic_review: String,
}

impl OrchestrationResult {
    /// Render the Markdown document: a top-level summary heading followed by
    /// three second-level sections.
    ///
    /// Headings inside the bodies (LLM reports are often sectioned) are
    /// pushed two levels down, so the four section headings are the only
    /// ones at level one or two.
    pub fn to_markdown(&self) -> String {
        format!(
            "# {}\n{}\n\n## {}\n{}\n\n## {}\n{}\n\n## {}\n{}\n",
            MARKDOWN_SECTIONS[0],
            demote_headings(&self.summary),
            MARKDOWN_SECTIONS[1],
            demote_headings(&self.findings),
            MARKDOWN_SECTIONS[2],
            demote_headings(&self.citations),
            MARKDOWN_SECTIONS[3],
            demote_headings(&self.critic_review)
        )
    }

    /// Pretty-printed JSON with keys `summary`, `findings`, `citations`,
    /// `critic_review`.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report as JSON")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse report JSON")
    }

    pub fn write_markdown(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_markdown())
            .with_context(|| format!("Failed to write Markdown report to {}", path.display()))?;
        info!(path = %path.display(), "Markdown report written");
        Ok(())
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write JSON report to {}", path.display()))?;
        info!(path = %path.display(), "JSON report written");
        Ok(())
    }
}

/// Prefix every ATX heading line in `body` with `##`.
fn demote_headings(body: &str) -> String {
    body.lines()
        .map(|line| {
            if is_atx_heading(line) {
                format!("##{}", line.trim_start())
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `#` to `######` followed by a space or the end of the line.
fn is_atx_heading(line: &str) -> bool {
    let trimmed = line.trim_start();
    let hashes = trimmed.chars().take_while(|&c| c == '#').count();
    (1..=6).contains(&hashes)
        && trimmed[hashes..]
            .chars()
            .next()
            .map_or(true, char::is_whitespace)
}
