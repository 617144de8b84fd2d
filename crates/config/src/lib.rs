// Configuration Management
//
// This crate handles all configuration loading for the chat gateway.
// Everything is resolved from environment variables at startup; the
// provider API key deliberately falls back to a placeholder sentinel
// instead of failing, so the resolver can degrade to mock replies.

use thiserror::Error;

pub mod types;

// Re-export all configuration types
pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("unknown provider {value:?}, expected \"openai\" or \"deepseek\"")]
    UnknownProvider { value: String },
}
