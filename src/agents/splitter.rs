//! # Topic Splitter
//!
//! Asks the model for 2–3 narrower sub-topics and decodes the reply.
//!
//! Decoding is best-effort in two explicit steps:
//! 1. [`parse_list_literal`] - strict decode of a list of strings
//!    (a JSON array, or a bracketed list with single-quoted items)
//! 2. [`parse_lines`] - one sub-topic per non-empty line, bullets removed
//!
//! The count is not enforced: callers must cope with zero or many items.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::TopicSplitter;
use crate::error::AgentResult;
use crate::llm::CompletionService;

const SPLIT_MAX_TOKENS: u64 = 150;

/// Build the splitting instruction for a topic.
fn split_prompt(topic: &str) -> String {
    format!(
        "Given the research topic: '{}', list 2-3 focused sub-topics that are narrower \
         and suitable for deeper research. Return only the sub-topics as a JSON array of strings.",
        topic
    )
}

// =============================================================================
// LLM SPLITTER
// =============================================================================
/// Splits a topic with a single completion call.
pub struct LlmSplitter {
    llm: Arc<dyn CompletionService>,
    temperature: f64,
}

impl LlmSplitter {
    pub fn new(llm: Arc<dyn CompletionService>, temperature: f64) -> Self {
        Self { llm, temperature }
    }
}

#[async_trait]
impl TopicSplitter for LlmSplitter {
    async fn split(&self, topic: &str) -> AgentResult<Vec<String>> {
        let reply = self
            .llm
            .complete(&split_prompt(topic), SPLIT_MAX_TOKENS, self.temperature)
            .await?;

        let subtopics = parse_subtopics(&reply);
        info!(topic = %topic, count = subtopics.len(), "Topic split into sub-topics");
        Ok(subtopics)
    }
}

// =============================================================================
// REPLY DECODING
// =============================================================================
/// Decode a splitter reply, falling back to line splitting.
pub fn parse_subtopics(reply: &str) -> Vec<String> {
    match parse_list_literal(reply) {
        Some(items) => items,
        None => {
            debug!("Reply is not a list literal, splitting by line");
            parse_lines(reply)
        }
    }
}

/// Strict decode of a list of strings. `None` when the reply is not one.
pub fn parse_list_literal(reply: &str) -> Option<Vec<String>> {
    let text = strip_code_fence(reply.trim());
    serde_json::from_str::<Vec<String>>(text)
        .ok()
        .or_else(|| parse_quoted_list(text))
}

/// One sub-topic per non-empty line, with bullets and numbering removed.
pub fn parse_lines(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remove a surrounding ```lang ... ``` fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(newline) = rest.find('\n') else {
        return text;
    };
    let body = &rest[newline + 1..];
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Decode `['a', "b", ...]`. Items must all be quoted strings.
fn parse_quoted_list(text: &str) -> Option<Vec<String>> {
    let inner = text.strip_prefix('[')?.strip_suffix(']')?;
    let mut chars = inner.chars().peekable();
    let mut items = Vec::new();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(quote) = chars.next() else {
            break;
        };
        if quote != '\'' && quote != '"' {
            return None;
        }

        let mut item = String::new();
        loop {
            match chars.next()? {
                '\\' => item.push(chars.next()?),
                c if c == quote => break,
                c => item.push(c),
            }
        }
        items.push(item);

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            Some(',') => continue,
            None => break,
            Some(_) => return None,
        }
    }

    Some(items)
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim().trim_start_matches('-').trim_start();

    let line = match line.strip_prefix(&['*', '•'][..]) {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => line,
    };

    // "1. topic" / "2) topic"
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(after) = rest.strip_prefix(&['.', ')'][..]) {
            if after.starts_with(char::is_whitespace) {
                return after.trim();
            }
        }
    }

    line.trim()
}
