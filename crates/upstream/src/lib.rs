//! Upstream chat-completion client
//!
//! This crate owns the boundary to the external chat-completion HTTP API.
//! It exposes a single-operation `CompletionProvider` trait so the rest of
//! the gateway never talks to the wire directly, an OpenAI-compatible
//! implementation of that trait, and a scriptable mock for tests.
//!
//! Streaming is deliberately not supported: every request is a blocking
//! `stream: false` completion and the full response is returned at once.

pub mod mock;
pub mod models;
pub mod openai;

use async_trait::async_trait;

// Re-export commonly used types for convenience
pub use mock::MockProvider;
pub use models::{
    ChatCompletionChoice, ChatCompletionParams, ChatCompletionResponse, ChatMessage,
    ChatResponseMessage, CompletionError, MessageRole, TokenUsage,
};
pub use openai::OpenAiClient;

/// Boundary trait for the external chat-completion provider.
///
/// The gateway depends on exactly two observable behaviors: a successful
/// call yields choices exposing a text field plus a usage breakdown, and a
/// failed call yields a `CompletionError` carrying the HTTP status code or
/// a recognizable category.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Performs one non-streaming chat completion request.
    async fn chat_completion(
        &self,
        params: ChatCompletionParams,
    ) -> Result<ChatCompletionResponse, CompletionError>;
}

/// Extract a human-readable message from a provider error body.
///
/// OpenAI-compatible providers wrap errors as `{"error": {"message": ...}}`;
/// anything that does not parse that way is returned verbatim.
pub fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_message_from_error_envelope() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(extract_error_message(body), "Incorrect API key provided");
    }

    #[test]
    fn falls_back_to_raw_body() {
        assert_eq!(extract_error_message("upstream exploded"), "upstream exploded");
        assert_eq!(extract_error_message(r#"{"detail":"nope"}"#), r#"{"detail":"nope"}"#);
    }
}
