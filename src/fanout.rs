//! # Research Fan-Out
//!
//! Runs the researcher over every sub-topic concurrently and joins the
//! results. Each worker returns its finding to the collecting loop, so there
//! is no shared mutable container.
//!
//! Collection happens in completion order; the returned set is reordered to
//! match the input sub-topics so downstream rendering is deterministic.

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{info, warn};

use crate::agents::SubtopicResearcher;
use crate::error::{AgentError, AgentResult};
use crate::model::{ResearchFinding, ResearchResultSet};

/// What to do when a research worker fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The first failure fails the whole stage.
    FailFast,
    /// Failed workers are logged and dropped; the stage fails only when
    /// every worker failed.
    #[default]
    Partial,
}

/// Research every sub-topic concurrently and wait for all of them.
///
/// No concurrency cap: one in-flight worker per sub-topic.
pub async fn fan_out(
    researcher: &dyn SubtopicResearcher,
    subtopics: &[String],
    policy: FailurePolicy,
) -> AgentResult<ResearchResultSet> {
    let total = subtopics.len();
    info!(workers = total, ?policy, "Starting research fan-out");

    let mut in_flight: FuturesUnordered<_> = subtopics
        .iter()
        .enumerate()
        .map(|(index, subtopic)| async move { (index, researcher.research(subtopic).await) })
        .collect();

    let mut completed: Vec<(usize, ResearchFinding)> = Vec::with_capacity(total);
    let mut failures: Vec<AgentError> = Vec::new();

    while let Some((index, result)) = in_flight.next().await {
        match result {
            Ok(finding) => {
                info!(
                    subtopic = %finding.subtopic,
                    done = completed.len() + failures.len() + 1,
                    total,
                    "Research worker finished"
                );
                completed.push((index, finding));
            }
            Err(e) if policy == FailurePolicy::FailFast => return Err(e),
            Err(e) => {
                warn!(subtopic = %subtopics[index], error = %e, "Research worker failed, dropping sub-topic");
                failures.push(e);
            }
        }
    }

    if completed.is_empty() && !failures.is_empty() {
        let first = failures.remove(0);
        return Err(AgentError::AllWorkersFailed(total, first.to_string()));
    }

    if !failures.is_empty() {
        warn!(
            failed = failures.len(),
            succeeded = completed.len(),
            "Continuing with partial findings"
        );
    }

    completed.sort_by_key(|(index, _)| *index);
    Ok(ResearchResultSet::new(
        completed.into_iter().map(|(_, finding)| finding).collect(),
    ))
}
