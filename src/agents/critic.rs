//! # Critic
//!
//! Free-text review of a report, plus the keyword heuristic that decides
//! whether the review asks for a revision.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::Critic;
use crate::error::AgentResult;
use crate::llm::CompletionService;

const REVIEW_MAX_TOKENS: u64 = 300;

/// Words that mark a review as flagging issues (matched case-insensitively,
/// anywhere in the text).
pub const TRIGGER_KEYWORDS: [&str; 7] = [
    "error",
    "unsupported",
    "clarification",
    "inaccurate",
    "incorrect",
    "issue",
    "problem",
];

/// Critique verdict: `true` when the review contains any trigger keyword.
///
/// This is a substring heuristic, so "no issues found" also counts.
pub fn flags_issues(review: &str) -> bool {
    let review = review.to_lowercase();
    TRIGGER_KEYWORDS.iter().any(|word| review.contains(word))
}

fn review_prompt(report: &str) -> String {
    format!(
        "You are a research critic agent. Review the following report for factual consistency \
         and accuracy. Highlight any potential errors, unsupported claims, or areas needing \
         clarification.\n\nReport:\n{}",
        report
    )
}

// =============================================================================
// LLM CRITIC
// =============================================================================
/// Critic backed by the completion service. The reply is returned as is;
/// the verdict is [`flags_issues`].
pub struct LlmCritic {
    llm: Arc<dyn CompletionService>,
    temperature: f64,
}

impl LlmCritic {
    pub fn new(llm: Arc<dyn CompletionService>, temperature: f64) -> Self {
        Self { llm, temperature }
    }
}

#[async_trait]
impl Critic for LlmCritic {
    async fn review(&self, report: &str) -> AgentResult<String> {
        let review = self
            .llm
            .complete(&review_prompt(report), REVIEW_MAX_TOKENS, self.temperature)
            .await?;
        info!(flags_issues = flags_issues(&review), "Report reviewed");
        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedLlm(&'static str);

    #[async_trait]
    impl CompletionService for CannedLlm {
        async fn complete(&self, prompt: &str, max_tokens: u64, _t: f64) -> AgentResult<String> {
            assert_eq!(max_tokens, REVIEW_MAX_TOKENS);
            assert!(prompt.ends_with("Report:\nthe report"));
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_every_keyword_flags_issues() {
        for word in TRIGGER_KEYWORDS {
            assert!(flags_issues(&format!("There is one {} here.", word)), "{}", word);
        }
    }

    #[test]
    fn test_keyword_match_is_case_insensitive_substring() {
        assert!(flags_issues("Several ERRORS in section 2"));
        assert!(flags_issues("Problematic framing"));
        assert!(flags_issues("No issues found."));
    }

    #[test]
    fn test_clean_review_does_not_flag() {
        assert!(!flags_issues("Looks good"));
        assert!(!flags_issues(""));
    }

    #[tokio::test]
    async fn test_review_returns_raw_reply() {
        let critic = LlmCritic::new(Arc::new(CannedLlm("Looks good")), 0.7);
        assert_eq!(critic.review("the report").await.unwrap(), "Looks good");
    }
}
