//! OpenAI-compatible client implementation
//!
//! Works against any provider that implements OpenAI's chat-completion API
//! format, including:
//! - OpenAI (api.openai.com)
//! - DeepSeek (api.deepseek.com)
//! - Any other OpenAI-compatible provider
//!
//! The only provider-specific inputs are the base URL, model id and token
//! ceiling, all carried by `ProviderSettings`.

use crate::{
    extract_error_message, ChatCompletionParams, ChatCompletionResponse, CompletionError,
    CompletionProvider,
};
use async_trait::async_trait;
use config::ProviderSettings;
use reqwest::{header::HeaderValue, Client};

/// OpenAI-compatible chat-completion client
pub struct OpenAiClient {
    client: Client,
    settings: ProviderSettings,
}

impl OpenAiClient {
    pub fn new(settings: ProviderSettings) -> Self {
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(30))
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, settings }
    }

    fn build_headers(&self) -> Result<reqwest::header::HeaderMap, CompletionError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let auth_value = format!("Bearer {}", self.settings.api_key);
        let header_value = HeaderValue::from_str(&auth_value)
            .map_err(|e| CompletionError::Other(format!("Invalid API key format: {e}")))?;
        headers.insert("Authorization", header_value);

        Ok(headers)
    }

    fn map_transport_error(e: reqwest::Error) -> CompletionError {
        if e.is_timeout() {
            CompletionError::Timeout(e.to_string())
        } else if e.is_connect() {
            CompletionError::Network(e.to_string())
        } else {
            CompletionError::Other(e.to_string())
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn chat_completion(
        &self,
        params: ChatCompletionParams,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        let url = format!("{}/chat/completions", self.settings.base_url);

        // Ensure non-streaming
        let mut non_streaming_params = params;
        non_streaming_params.stream = Some(false);

        let headers = self.build_headers()?;
        let timeout = std::time::Duration::from_secs(self.settings.timeout_seconds);

        tracing::debug!(url = %url, model = %non_streaming_params.model, "sending chat completion request");

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .timeout(timeout)
            .json(&non_streaming_params)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response body: {e}"));
            return Err(CompletionError::Http {
                status_code,
                message: extract_error_message(&error_text),
            });
        }

        let chat_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        Ok(chat_response)
    }
}
