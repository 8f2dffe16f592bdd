//! # LLM Module
//!
//! The language-model seam used by every agent, and its production
//! implementation on top of rig-core's OpenAI provider.
//!
//! Agents only see [`CompletionService`], so tests swap in scripted fakes
//! and the orchestrator never touches a process-wide client.

use std::future::IntoFuture;
use std::time::Duration;

use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::openai::Client;
use tracing::{debug, warn};

use crate::error::{AgentError, AgentResult};

// =============================================================================
// COMPLETION SERVICE TRAIT
// =============================================================================
/// A single-prompt text completion.
///
/// # Rust Concept: `async_trait`
///
/// Async functions in traits are not object-safe on their own. The
/// `#[async_trait]` macro boxes the returned future so the orchestrator can
/// hold agents as `Arc<dyn ...>`.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        max_output_tokens: u64,
        temperature: f64,
    ) -> AgentResult<String>;
}

// =============================================================================
// OPENAI COMPLETION (RIG)
// =============================================================================
/// OpenAI chat completion through rig-core.
pub struct OpenAiCompletion {
    client: Client,
    model: String,
    timeout: Option<Duration>,
}

impl OpenAiCompletion {
    /// Create a completion service with an explicit API key.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let api_key: String = api_key.into();
        Self {
            client: Client::from_val(api_key.into()),
            model: model.into(),
            timeout: None,
        }
    }

    /// Bound every call; a zero duration leaves calls unbounded.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

}

#[async_trait]
impl CompletionService for OpenAiCompletion {
    async fn complete(
        &self,
        prompt: &str,
        max_output_tokens: u64,
        temperature: f64,
    ) -> AgentResult<String> {
        debug!(
            model = %self.model,
            max_output_tokens,
            temperature,
            prompt_chars = prompt.len(),
            "Calling LLM"
        );

        let agent = self
            .client
            .agent(&self.model)
            .temperature(temperature)
            .max_tokens(max_output_tokens)
            .build();

        let response = bounded(self.timeout, agent.prompt(prompt))
            .await?
            .map_err(|e| AgentError::Llm(format!("OpenAI completion failed: {}", e)))?;

        debug!(reply_chars = response.len(), "LLM call completed");

        Ok(response.trim().to_string())
    }
}

/// Await `call`, giving up once `limit` has elapsed.
///
/// # Rust Concept: `IntoFuture`
///
/// rig's prompt request is a builder that becomes a future when awaited.
/// Accepting `IntoFuture` lets the same helper wrap it and plain futures.
pub(crate) async fn bounded<F>(limit: Option<Duration>, call: F) -> AgentResult<F::Output>
where
    F: IntoFuture,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
            warn!(timeout = ?limit, "LLM call timed out");
            AgentError::LlmTimeout(limit)
        }),
        None => Ok(call.await),
    }
}
