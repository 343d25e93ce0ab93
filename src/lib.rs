//! todo-summary - todo list with LLM summaries posted to a chat webhook
//!
//! Users create and delete todos through a REST API. A summarize endpoint
//! gathers the pending todos, asks a completion provider for a short
//! summary (falling back to a fixed template when that fails), and posts it
//! to a Slack-style webhook.
//!
//! # Modules
//!
//! - [`server`] - axum HTTP API and static frontend
//! - [`summary`] - the read, complete, notify pipeline
//! - [`llm`] - completion client trait with OpenAI and Anthropic providers
//! - [`notify`] - webhook notifier
//! - [`tui`] - terminal UI driven through [`api::ApiClient`]
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface
//!
//! Storage lives in the `todostore` crate.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod llm;
pub mod notify;
pub mod server;
pub mod summary;
pub mod tui;

// Re-export commonly used types
pub use config::{Config, LlmConfig};
pub use llm::{AnthropicClient, CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient};
pub use notify::{Notifier, NotifyError, SlackWebhook};
pub use server::{AppState, build_router};
pub use summary::{SummarizeError, Summarizer, SummaryOutcome};
pub use todostore::{NewTodo, Todo, TodoId, TodoStore};
