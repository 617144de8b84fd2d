//! Message resolver
//!
//! Turns one inbound chat message into one terminal `ChatOutcome`. This is
//! the only component with real branching logic: input validation, the
//! configuration guard, the single upstream invocation, success mapping and
//! failure classification all live here.

pub mod policy;

use std::sync::Arc;

use config::ProviderSettings;
use policy::{Disposition, ErrorKind};
use upstream::{ChatCompletionParams, ChatMessage, CompletionProvider, OpenAiClient};

pub const EMPTY_MESSAGE_ERROR: &str = "Message cannot be empty";
pub const MESSAGE_TOO_LONG_ERROR: &str = "Message is too long (limit 4096 characters)";
pub const NO_RESPONSE_PLACEHOLDER: &str = "no response generated";

/// Upper bound on message length, counted in characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

const TEMPERATURE: f32 = 0.7;

/// Terminal result of resolving one message.
///
/// On strict-failure paths exactly one of the fields is active; on
/// degraded/mock paths a non-empty `response` coexists with a null `error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOutcome {
    pub response: String,
    pub error: Option<String>,
}

impl ChatOutcome {
    fn reply(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            error: None,
        }
    }

    fn rejected(error: impl Into<String>) -> Self {
        Self {
            response: String::new(),
            error: Some(error.into()),
        }
    }
}

/// Per-request bundle of the provider handle and its settings.
///
/// Built fresh for every mutation and discarded at response time; nothing
/// is shared across requests.
pub struct RequestContext {
    pub provider: Arc<dyn CompletionProvider>,
    pub settings: ProviderSettings,
}

impl RequestContext {
    /// Build a context backed by the real HTTP client.
    pub fn new(settings: &ProviderSettings) -> Self {
        Self {
            provider: Arc::new(OpenAiClient::new(settings.clone())),
            settings: settings.clone(),
        }
    }

    /// Build a context around an arbitrary provider. Test seam.
    pub fn with_provider(settings: ProviderSettings, provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider, settings }
    }
}

/// Builds a fresh `RequestContext` per request.
///
/// The API surface holds one of these for the lifetime of the process and
/// calls `make` once per mutation; tests swap in a scripted provider.
#[derive(Clone)]
pub struct ContextFactory {
    settings: ProviderSettings,
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl ContextFactory {
    /// Factory producing HTTP-backed contexts from the given settings.
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            settings,
            provider: None,
        }
    }

    /// Factory producing contexts around a fixed provider. Test seam.
    pub fn with_provider(settings: ProviderSettings, provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            settings,
            provider: Some(provider),
        }
    }

    pub fn make(&self) -> RequestContext {
        match &self.provider {
            Some(provider) => RequestContext::with_provider(self.settings.clone(), provider.clone()),
            None => RequestContext::new(&self.settings),
        }
    }
}

/// Blank means nothing but whitespace and control characters.
fn is_blank(message: &str) -> bool {
    message.chars().all(|c| c.is_whitespace() || c.is_control())
}

/// Resolve one chat message to a terminal outcome.
///
/// Never returns an error: every failure mode, from invalid input to an
/// unreachable upstream, is converted into a `ChatOutcome` here.
pub async fn send_message(ctx: &RequestContext, message: &str) -> ChatOutcome {
    if is_blank(message) {
        return ChatOutcome::rejected(EMPTY_MESSAGE_ERROR);
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return ChatOutcome::rejected(MESSAGE_TOO_LONG_ERROR);
    }

    if !ctx.settings.has_usable_key() {
        tracing::warn!("no usable API key configured, returning offline mock reply");
        return ChatOutcome::reply(policy::offline_reply(message));
    }

    let params = ChatCompletionParams {
        model: ctx.settings.model.clone(),
        messages: vec![
            ChatMessage::system(ctx.settings.system_prompt.as_str()),
            ChatMessage::user(message),
        ],
        max_tokens: Some(ctx.settings.max_tokens),
        temperature: Some(TEMPERATURE),
        stream: Some(false),
    };

    match ctx.provider.chat_completion(params).await {
        Ok(completion) => {
            if let Some(usage) = &completion.usage {
                tracing::debug!(
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    total_tokens = usage.total_tokens,
                    "chat completion succeeded"
                );
            }
            let text = completion
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .filter(|content| !content.is_empty())
                .unwrap_or_else(|| NO_RESPONSE_PLACEHOLDER.to_string());
            ChatOutcome::reply(text)
        }
        Err(error) => {
            let kind = ErrorKind::classify(&error);
            tracing::error!(error = %error, kind = ?kind, "chat completion failed");
            match kind.disposition() {
                Disposition::Surface(wording) => ChatOutcome::rejected(wording),
                Disposition::Degrade(template) => ChatOutcome::reply(template(message)),
            }
        }
    }
}
