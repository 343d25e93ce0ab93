//! Summarize pending todos and post the result to the chat webhook

use std::sync::Arc;

use thiserror::Error;
use todostore::{StoreError, Todo, TodoStore};
use tracing::{debug, info, warn};

use crate::llm::{CompletionRequest, LlmClient};
use crate::notify::{Notifier, NotifyError};

/// Heading prepended to every posted summary
pub const SUMMARY_LABEL: &str = "📋 *Todo Summary*";

const PROMPT_PREFIX: &str = "Please provide a concise summary of the following todo items:\n";

/// Errors that abort a summary run
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Notify(#[from] NotifyError),
}

impl SummarizeError {
    pub fn details(&self) -> Option<String> {
        match self {
            SummarizeError::Store(_) => None,
            SummarizeError::Notify(e) => e.details(),
        }
    }
}

/// Result of a successful summary run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// No pending todos; nothing was posted
    NothingPending,

    /// A summary was posted
    Sent { text: String, used_fallback: bool },
}

/// One `- title: description` line per todo; `- title` when there is no description
pub fn summary_lines(todos: &[Todo]) -> String {
    todos
        .iter()
        .map(|todo| match todo.description_text() {
            Some(description) => format!("- {}: {}", todo.title, description),
            None => format!("- {}", todo.title),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(todos: &[Todo]) -> String {
    format!("{}{}", PROMPT_PREFIX, summary_lines(todos))
}

/// Deterministic summary used when the completion call fails
pub fn fallback_summary(todos: &[Todo]) -> String {
    format!("Summary of {} pending todo items:\n\n{}", todos.len(), summary_lines(todos))
}

/// Message body posted to the webhook
pub fn notification_text(summary: &str) -> String {
    format!("{}\n\n{}", SUMMARY_LABEL, summary)
}

/// Runs the read, complete, notify pipeline
#[derive(Clone)]
pub struct Summarizer {
    store: Arc<dyn TodoStore>,
    llm: Arc<dyn LlmClient>,
    notifier: Arc<dyn Notifier>,
    max_tokens: u32,
}

impl Summarizer {
    pub fn new(store: Arc<dyn TodoStore>, llm: Arc<dyn LlmClient>, notifier: Arc<dyn Notifier>, max_tokens: u32) -> Self {
        Self {
            store,
            llm,
            notifier,
            max_tokens,
        }
    }

    pub async fn run(&self) -> Result<SummaryOutcome, SummarizeError> {
        debug!(model = %self.llm.model(), "Summarizer::run: called");
        let pending = self.store.list_pending().await?;
        if pending.is_empty() {
            info!("No pending todos to summarize");
            return Ok(SummaryOutcome::NothingPending);
        }

        let (text, used_fallback) = self.generate(&pending).await;
        self.notifier.send(&notification_text(&text)).await?;

        info!(count = pending.len(), used_fallback, "Summary posted");
        Ok(SummaryOutcome::Sent { text, used_fallback })
    }

    /// Ask the completion client; any failure or blank reply yields the fallback
    async fn generate(&self, pending: &[Todo]) -> (String, bool) {
        debug!(count = pending.len(), "generate: called");
        let request = CompletionRequest::new(build_prompt(pending), self.max_tokens);
        match self.llm.complete(request).await {
            Ok(response) => {
                info!(
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    stop_reason = ?response.stop_reason,
                    "Completion finished"
                );
                match response.text_content() {
                    Some(text) => (text.to_string(), false),
                    None => {
                        warn!("Completion returned no text, using fallback summary");
                        (fallback_summary(pending), true)
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Completion failed, using fallback summary");
                (fallback_summary(pending), true)
            }
        }
    }
}
