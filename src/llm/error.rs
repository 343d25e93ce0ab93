//! Completion client errors
//!
//! Every variant ends in the fallback summary; none is retried.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    /// Non-success status from the provider
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API key not found. Set the {0} environment variable.")]
    MissingApiKey(String),

    #[error("Unknown LLM provider: '{0}'. Supported: openai, anthropic")]
    UnknownProvider(String),

    #[error("Completion client unavailable: {0}")]
    Unavailable(String),
}
