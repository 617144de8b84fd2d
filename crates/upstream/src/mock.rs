//! Mock implementation of CompletionProvider for testing
//!
//! This module provides a scriptable provider that replays queued results
//! without touching the network. Tests can inspect how many times the
//! provider was invoked and with which parameters.

use crate::{
    ChatCompletionChoice, ChatCompletionParams, ChatCompletionResponse, ChatResponseMessage,
    CompletionError, CompletionProvider, MessageRole, TokenUsage,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scriptable completion provider.
///
/// Queued results are replayed in order; once the queue is empty every call
/// yields a default canned reply. All bookkeeping is interior so a shared
/// `Arc<MockProvider>` can be inspected after the code under test ran.
pub struct MockProvider {
    script: Mutex<VecDeque<Result<ChatCompletionResponse, CompletionError>>>,
    requests: Mutex<Vec<ChatCompletionParams>>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider that answers every call with the given text.
    pub fn with_reply(text: impl Into<String>) -> Self {
        let provider = Self::new();
        provider.push_reply(text);
        provider
    }

    /// Queue a successful completion with the given content.
    pub fn push_reply(&self, text: impl Into<String>) {
        self.push_response(Self::canned_response(Some(&text.into())));
    }

    /// Queue a raw completion response.
    pub fn push_response(&self, response: ChatCompletionResponse) {
        self.script.lock().unwrap().push_back(Ok(response));
    }

    /// Queue a failure.
    pub fn push_error(&self, error: CompletionError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// Number of chat_completion invocations so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Parameters of every invocation, in order.
    pub fn requests(&self) -> Vec<ChatCompletionParams> {
        self.requests.lock().unwrap().clone()
    }

    /// Build a canned completion response.
    ///
    /// `None` content models providers that return a choice without text.
    pub fn canned_response(content: Option<&str>) -> ChatCompletionResponse {
        let completion_tokens = content
            .map(|c| c.split_whitespace().count() as i32)
            .unwrap_or(0);

        ChatCompletionResponse {
            id: "chatcmpl-mock".to_string(),
            object: "chat.completion".to_string(),
            created: 1_700_000_000,
            model: "mock-model".to_string(),
            choices: vec![ChatCompletionChoice {
                index: 0,
                message: ChatResponseMessage {
                    role: MessageRole::Assistant,
                    content: content.map(|c| c.to_string()),
                },
                finish_reason: Some("stop".to_string()),
            }],
            usage: Some(TokenUsage::new(10, completion_tokens)),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn chat_completion(
        &self,
        params: ChatCompletionParams,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(params);

        match self.script.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(Self::canned_response(Some("This is a mock response."))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ChatCompletionParams {
        ChatCompletionParams {
            model: "mock-model".to_string(),
            messages: vec![crate::ChatMessage::user("hi")],
            max_tokens: Some(100),
            temperature: Some(0.7),
            stream: Some(false),
        }
    }

    #[tokio::test]
    async fn test_replays_script_in_order() {
        let provider = MockProvider::new();
        provider.push_reply("first");
        provider.push_error(CompletionError::Http {
            status_code: 429,
            message: "rate limit".to_string(),
        });

        let first = provider.chat_completion(params()).await.unwrap();
        assert_eq!(
            first.choices[0].message.content.as_deref(),
            Some("first")
        );

        let second = provider.chat_completion(params()).await.unwrap_err();
        assert!(matches!(
            second,
            CompletionError::Http { status_code: 429, .. }
        ));

        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_records_request_params() {
        let provider = MockProvider::with_reply("ok");
        provider.chat_completion(params()).await.unwrap();

        let recorded = provider.requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].model, "mock-model");
        assert_eq!(recorded[0].stream, Some(false));
    }

    #[tokio::test]
    async fn test_empty_script_yields_default_reply() {
        let provider = MockProvider::new();
        let response = provider.chat_completion(params()).await.unwrap();
        assert_eq!(
            response.choices[0].message.content.as_deref(),
            Some("This is a mock response.")
        );
    }
}
