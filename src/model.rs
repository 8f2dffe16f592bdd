//! # Model Module
//!
//! Plain data types shared by the agents: the report style, one sub-topic's
//! finding, and the set of findings produced by the research fan-out.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// REPORT STYLE
// =============================================================================
/// Writing style requested for the synthesized report.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Academic,
    Business,
    Layperson,
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Academic => "academic",
            Style::Business => "business",
            Style::Layperson => "layperson",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// RESEARCH FINDING
// =============================================================================
/// One sub-topic's search-backed summary.
///
/// `citations` holds the links of the search hits that were summarized, in
/// search order. A hit without a link contributes an empty entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchFinding {
    pub subtopic: String,
    pub summary: String,
    pub citations: Vec<String>,
}

impl ResearchFinding {
    pub fn new(
        subtopic: impl Into<String>,
        summary: impl Into<String>,
        citations: Vec<String>,
    ) -> Self {
        Self {
            subtopic: subtopic.into(),
            summary: summary.into(),
            citations,
        }
    }
}

// =============================================================================
// RESULT SET
// =============================================================================
/// Findings gathered by the research fan-out, one per successful sub-topic,
/// ordered like the sub-topics that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResearchResultSet {
    findings: Vec<ResearchFinding>,
}

impl ResearchResultSet {
    pub fn new(findings: Vec<ResearchFinding>) -> Self {
        Self { findings }
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResearchFinding> {
        self.findings.iter()
    }

    /// Rendering embedded in the synthesis prompt.
    pub fn render_for_synthesis(&self) -> String {
        self.findings
            .iter()
            .map(|f| {
                format!(
                    "Subtopic: {}\nSummary: {}\nCitations: {}",
                    f.subtopic,
                    f.summary,
                    f.citations.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Rendering shown to the user as "Per-Researcher Findings".
    pub fn render_findings(&self) -> String {
        self.findings
            .iter()
            .map(|f| format!("{}:\n{}", f.subtopic, f.summary))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Every citation of every finding, one per line.
    pub fn flattened_citations(&self) -> String {
        self.findings
            .iter()
            .flat_map(|f| f.citations.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a ResearchResultSet {
    type Item = &'a ResearchFinding;
    type IntoIter = std::slice::Iter<'a, ResearchFinding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.iter()
    }
}
