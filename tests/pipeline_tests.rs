//! Pipeline tests with the LLM-backed agents
//!
//! The real splitter, researcher, synthesizer and critic run against a fake
//! completion service (answers chosen by prompt) and a fake search service,
//! so prompts, parsing and rendering are exercised together.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use multi_agent_research::agents::{LlmCritic, LlmSplitter, LlmSynthesizer, ScholarResearcher};
use multi_agent_research::error::AgentResult;
use multi_agent_research::llm::CompletionService;
use multi_agent_research::search::{SearchHit, SearchService};
use multi_agent_research::{OrchestrationResult, Orchestrator, SearchError, Style};

/// Answers by recognizing which agent wrote the prompt.
struct RoutingLlm {
    split_reply: &'static str,
    reviews: Mutex<Vec<&'static str>>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl RoutingLlm {
    fn new(split_reply: &'static str, reviews: Vec<&'static str>) -> Self {
        Self {
            split_reply,
            reviews: Mutex::new(reviews),
            calls: Mutex::new(HashMap::new()),
        }
    }

    fn count(&self, role: &str) -> usize {
        self.calls.lock().unwrap().get(role).copied().unwrap_or(0)
    }
}

#[async_trait]
impl CompletionService for RoutingLlm {
    async fn complete(&self, prompt: &str, _max: u64, _temperature: f64) -> AgentResult<String> {
        let role = if prompt.starts_with("Given the research topic") {
            "split"
        } else if prompt.starts_with("Summarize the following findings") {
            "summarize"
        } else if prompt.starts_with("You are a research synthesis agent") {
            "synthesize"
        } else if prompt.starts_with("You are a research critic agent") {
            "review"
        } else if prompt.starts_with("Revise the following report") {
            "refine"
        } else {
            panic!("unexpected prompt: {}", prompt);
        };
        *self.calls.lock().unwrap().entry(role).or_insert(0) += 1;

        let reply = match role {
            "split" => self.split_reply.to_string(),
            "summarize" => {
                let subtopic = prompt
                    .split('\'')
                    .nth(1)
                    .unwrap_or_default()
                    .to_string();
                format!("TL;DR for {}", subtopic)
            }
            "synthesize" => "Executive Summary: AI is reshaping care.".to_string(),
            "refine" => "Executive Summary (revised): AI is reshaping care.".to_string(),
            _ => {
                let mut reviews = self.reviews.lock().unwrap();
                if reviews.len() > 1 {
                    reviews.remove(0).to_string()
                } else {
                    reviews[0].to_string()
                }
            }
        };
        Ok(reply)
    }
}

struct PaperSearch;

#[async_trait]
impl SearchService for PaperSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let slug = query.to_lowercase().replace(' ', "-");
        Ok((1..=4)
            .map(|n| SearchHit {
                title: Some(format!("{} paper {}", query, n)),
                link: Some(format!("https://papers.example/{}/{}", slug, n)),
                snippet: Some("An abstract.".to_string()),
            })
            .collect())
    }
}

fn build(llm: Arc<RoutingLlm>) -> Orchestrator {
    Orchestrator::new(
        Arc::new(LlmSplitter::new(llm.clone(), 0.7)),
        Arc::new(ScholarResearcher::new(Arc::new(PaperSearch), llm.clone(), 0.7)),
        Arc::new(LlmSynthesizer::new(llm.clone(), 0.7)),
        Arc::new(LlmCritic::new(llm, 0.7)),
    )
}

#[tokio::test]
async fn test_pipeline_with_clean_review() {
    let llm = Arc::new(RoutingLlm::new(
        r#"["AI diagnostics", "AI in drug discovery"]"#,
        vec!["Looks good"],
    ));

    let result = build(llm.clone())
        .orchestrate("Impact of AI on healthcare", Style::Academic, 2)
        .await
        .unwrap();

    assert_eq!(llm.count("split"), 1);
    assert_eq!(llm.count("summarize"), 2);
    assert_eq!(llm.count("synthesize"), 1);
    assert_eq!(llm.count("review"), 1);
    assert_eq!(llm.count("refine"), 0);

    assert_eq!(result.summary, "Executive Summary: AI is reshaping care.");
    assert_eq!(
        result.findings,
        "AI diagnostics:\nTL;DR for AI diagnostics\n\n\
         AI in drug discovery:\nTL;DR for AI in drug discovery"
    );
    // three hits per sub-topic
    assert_eq!(result.citations.lines().count(), 6);
    assert!(result
        .citations
        .starts_with("https://papers.example/ai-diagnostics/1\n"));
    assert_eq!(result.critic_review, "Looks good");
}

#[tokio::test]
async fn test_pipeline_with_line_based_split_and_refinement() {
    let llm = Arc::new(RoutingLlm::new(
        "Here are the sub-topics:\n- Gene drives\n- Crop yields\n",
        vec!["One inaccurate statistic.", "Looks good"],
    ));

    let result = build(llm.clone())
        .orchestrate("CRISPR in agriculture", Style::Layperson, 2)
        .await
        .unwrap();

    // the preamble line is kept as a sub-topic by the line fallback
    assert_eq!(llm.count("summarize"), 3);
    assert_eq!(llm.count("refine"), 1);
    assert_eq!(llm.count("review"), 2);
    assert_eq!(
        result.summary,
        "Executive Summary (revised): AI is reshaping care."
    );
    assert_eq!(result.critic_review, "Looks good");
}

#[tokio::test]
async fn test_pipeline_result_exports() {
    let llm = Arc::new(RoutingLlm::new(r#"["Only one"]"#, vec!["Looks good"]));

    let result = build(llm)
        .orchestrate("Topic", Style::Business, 0)
        .await
        .unwrap();

    let parsed = OrchestrationResult::from_json(&result.to_json().unwrap()).unwrap();
    assert_eq!(parsed, result);

    let markdown = result.to_markdown();
    let headings: Vec<&str> = markdown.lines().filter(|l| l.starts_with('#')).collect();
    assert_eq!(
        headings,
        vec![
            "# Overall Summary",
            "## Per-Researcher Findings",
            "## Sources / Citations",
            "## Critic Agent Review",
        ]
    );
}
