//! Completion client module
//!
//! Provides the LLM client trait, provider implementations, and the factory
//! that picks one from configuration.

use std::sync::Arc;

use tracing::{debug, warn};

mod anthropic;
pub mod client;
mod error;
mod openai;
mod types;

pub use anthropic::AnthropicClient;
pub use client::{LlmClient, UnavailableClient};
pub use error::LlmError;
pub use openai::OpenAIClient;
pub use types::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config
///
/// Supports "openai" and "anthropic" providers.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "openai" => {
            debug!("create_client: creating OpenAI client");
            Ok(Arc::new(OpenAIClient::from_config(config)?))
        }
        "anthropic" => {
            debug!("create_client: creating Anthropic client");
            Ok(Arc::new(AnthropicClient::from_config(config)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::UnknownProvider(other.to_string()))
        }
    }
}

/// Like [`create_client`], but a client that cannot be built (missing key,
/// unknown provider) becomes an [`UnavailableClient`] so summaries still go
/// out using the fallback template.
pub fn create_client_or_unavailable(config: &LlmConfig) -> Arc<dyn LlmClient> {
    match create_client(config) {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Completion client unavailable, summaries will use the fallback template");
            Arc::new(UnavailableClient::new(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_is_rejected() {
        let config = LlmConfig {
            provider: "llama".to_string(),
            ..LlmConfig::default()
        };
        let err = create_client(&config).err().unwrap();
        assert!(err.to_string().contains("Unknown LLM provider: 'llama'"));
    }

    #[test]
    fn test_missing_key_yields_unavailable_client() {
        let config = LlmConfig {
            api_key_env: "TODO_SUMMARY_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..LlmConfig::default()
        };
        let client = create_client_or_unavailable(&config);
        assert_eq!(client.model(), "unavailable");
    }
}
