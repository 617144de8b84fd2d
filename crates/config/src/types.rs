use std::env;
use std::str::FromStr;

use crate::ConfigError;

/// Placeholder API key used when no real key is configured.
///
/// Downstream guards compare against this sentinel to decide whether the
/// upstream provider can actually be called, so an absent key must resolve
/// to this exact value rather than an empty string or an error.
pub const PLACEHOLDER_API_KEY: &str = "dummy-key";

/// System prompt sent as the first message of every conversation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a friendly, helpful AI assistant. \
    Reply clearly and accurately. Mirror the user's language: if the user writes in \
    Chinese, reply in Chinese; if in English, reply in English. Markdown output is \
    supported.";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub provider: ProviderSettings,
}

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            logging: LoggingConfig::from_env(),
            provider: ProviderSettings::from_env()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env::var("SERVER_PORT").unwrap_or_else(|_| "3000".to_string());
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: port.parse().map_err(|_| ConfigError::InvalidValue {
                name: "SERVER_PORT",
                value: port.clone(),
                reason: "must be a valid port number",
            })?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Env-filter string, e.g. "info" or "info,services=debug"
    pub level: String,
    /// Output format: "json", "compact" or "pretty"
    pub format: String,
}

impl LoggingConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        Self {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
        }
    }
}

/// Upstream provider variant.
///
/// Both variants speak the OpenAI chat-completion wire format; they differ
/// only in endpoint, model id and token ceiling, so the choice is collapsed
/// into configuration presets instead of parallel code paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    DeepSeek,
}

impl ProviderKind {
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::DeepSeek => "https://api.deepseek.com/v1",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::DeepSeek => "deepseek-chat",
        }
    }

    /// Completion token ceiling. DeepSeek supports more output tokens.
    pub fn default_max_tokens(self) -> i64 {
        match self {
            Self::OpenAi => 1000,
            Self::DeepSeek => 2000,
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Self::OpenAi),
            "deepseek" => Ok(Self::DeepSeek),
            other => Err(ConfigError::UnknownProvider {
                value: other.to_string(),
            }),
        }
    }
}

/// Settings for the upstream chat-completion provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: i64,
    pub system_prompt: String,
    pub timeout_seconds: u64,
}

impl ProviderSettings {
    /// Load from environment variables, applying the provider preset for
    /// anything not overridden explicitly.
    pub fn from_env() -> Result<Self, ConfigError> {
        let kind: ProviderKind = env::var("CHAT_PROVIDER")
            .unwrap_or_else(|_| "openai".to_string())
            .parse()?;

        let timeout = env::var("PROVIDER_TIMEOUT_SECONDS").unwrap_or_else(|_| "30".to_string());

        Ok(Self {
            kind,
            // A missing key is not a startup failure: the resolver serves
            // mock replies until a real key is configured.
            api_key: env::var("PROVIDER_API_KEY")
                .unwrap_or_else(|_| PLACEHOLDER_API_KEY.to_string()),
            base_url: env::var("PROVIDER_BASE_URL")
                .unwrap_or_else(|_| kind.default_base_url().to_string()),
            model: env::var("PROVIDER_MODEL").unwrap_or_else(|_| kind.default_model().to_string()),
            max_tokens: match env::var("PROVIDER_MAX_TOKENS") {
                Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                    name: "PROVIDER_MAX_TOKENS",
                    value: raw,
                    reason: "must be a positive integer",
                })?,
                Err(_) => kind.default_max_tokens(),
            },
            system_prompt: env::var("PROVIDER_SYSTEM_PROMPT")
                .unwrap_or_else(|_| DEFAULT_SYSTEM_PROMPT.to_string()),
            timeout_seconds: timeout.parse().map_err(|_| ConfigError::InvalidValue {
                name: "PROVIDER_TIMEOUT_SECONDS",
                value: timeout.clone(),
                reason: "must be a number of seconds",
            })?,
        })
    }

    /// Settings preset for a provider with the given key, no overrides.
    pub fn for_kind(kind: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            kind,
            api_key: api_key.into(),
            base_url: kind.default_base_url().to_string(),
            model: kind.default_model().to_string(),
            max_tokens: kind.default_max_tokens(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            timeout_seconds: 30,
        }
    }

    /// Whether a real API key is configured.
    ///
    /// The placeholder sentinel and blank strings both count as "no key";
    /// the resolver short-circuits to a mock reply in that case.
    pub fn has_usable_key(&self) -> bool {
        !self.api_key.trim().is_empty() && self.api_key != PLACEHOLDER_API_KEY
    }
}
