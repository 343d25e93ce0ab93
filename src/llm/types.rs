//! Completion request/response types
//!
//! Provider-neutral shapes; each client converts them to its own wire format.

use tracing::debug;

/// One single-turn completion call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Sent as the only user message
    pub prompt: String,

    /// Max tokens for the response (capped by the client's configured limit)
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens,
        }
    }
}

/// Response from a completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    /// Generated text (if any)
    pub content: Option<String>,

    /// Why the model stopped
    pub stop_reason: StopReason,

    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// A plain text response, as a model would return after a normal stop
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }

    /// Generated text exactly as returned; `None` when missing or whitespace only
    pub fn text_content(&self) -> Option<&str> {
        self.content.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
}

impl StopReason {
    /// Parse from Anthropic API stop_reason string
    pub fn from_anthropic(s: &str) -> Self {
        debug!(%s, "StopReason::from_anthropic: called");
        match s {
            "max_tokens" => StopReason::MaxTokens,
            "stop_sequence" => StopReason::StopSequence,
            _ => StopReason::EndTurn,
        }
    }

    /// Parse from OpenAI finish_reason string
    pub fn from_openai(s: Option<&str>) -> Self {
        debug!(?s, "StopReason::from_openai: called");
        match s {
            Some("length") => StopReason::MaxTokens,
            _ => StopReason::EndTurn,
        }
    }
}

/// Token counts reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_request() {
        let req = CompletionRequest::new("Summarize this", 256);
        assert_eq!(req.prompt, "Summarize this");
        assert_eq!(req.max_tokens, 256);
    }

    #[test]
    fn test_text_content_keeps_whitespace() {
        assert_eq!(CompletionResponse::text("  hi \n").text_content(), Some("  hi \n"));
        assert_eq!(CompletionResponse::text("line one\n\nline two").text_content(), Some("line one\n\nline two"));
    }

    #[test]
    fn test_text_content_rejects_blank() {
        assert_eq!(CompletionResponse::text("   ").text_content(), None);
        assert_eq!(CompletionResponse::text("").text_content(), None);

        let mut response = CompletionResponse::text("x");
        response.content = None;
        assert_eq!(response.text_content(), None);
    }

    #[test]
    fn test_stop_reason_parsing() {
        assert_eq!(StopReason::from_anthropic("end_turn"), StopReason::EndTurn);
        assert_eq!(StopReason::from_anthropic("max_tokens"), StopReason::MaxTokens);
        assert_eq!(StopReason::from_openai(Some("length")), StopReason::MaxTokens);
        assert_eq!(StopReason::from_openai(None), StopReason::EndTurn);
    }
}
