//! Failure classification and disposition policy
//!
//! Every upstream failure is mapped to one `ErrorKind`, and every kind has
//! exactly one disposition: surface a user-facing error string, or degrade
//! to a synthesized mock reply with a null error. Rate limits and unknown
//! failures are hidden behind mock text so the chat experience stays
//! uninterrupted; credential, quota, timeout and connectivity problems are
//! surfaced because the user can act on them.

use upstream::CompletionError;

const AUTH_ERROR: &str = "Invalid API key. Check your PROVIDER_API_KEY configuration.";
const QUOTA_ERROR: &str =
    "Insufficient API balance. Check your account balance or free quota with the provider.";
const TIMEOUT_ERROR: &str = "The request timed out. Please try again later.";
const NETWORK_ERROR: &str = "Network connection error. Check your network settings.";

/// Classified upstream failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    RateLimited,
    QuotaExceeded,
    Timeout,
    Network,
    Unknown,
}

/// What the resolver does with a classified failure.
pub enum Disposition {
    /// Populate the `error` field with this wording; `response` stays empty.
    Surface(&'static str),
    /// Synthesize a mock reply from the user's message; `error` stays null.
    Degrade(fn(&str) -> String),
}

impl ErrorKind {
    /// Classify a provider error.
    ///
    /// Structured information wins: HTTP status codes and typed transport
    /// variants map directly. Anything else goes through the substring shim
    /// over the error text, kept for providers whose failures only surface
    /// as free-form messages.
    pub fn classify(error: &CompletionError) -> Self {
        match error {
            CompletionError::Http {
                status_code: 401, ..
            } => Self::Auth,
            CompletionError::Http {
                status_code: 402, ..
            } => Self::QuotaExceeded,
            CompletionError::Http {
                status_code: 408, ..
            } => Self::Timeout,
            CompletionError::Http {
                status_code: 429, ..
            } => Self::RateLimited,
            CompletionError::Timeout(_) => Self::Timeout,
            CompletionError::Network(_) => Self::Network,
            other => Self::from_message(&other.to_string()),
        }
    }

    /// Substring-matching compatibility shim.
    ///
    /// Checks are case-sensitive and evaluated top to bottom; the first
    /// match wins, which is the defined tie-break for messages carrying
    /// more than one marker.
    pub fn from_message(message: &str) -> Self {
        if message.contains("401") || message.contains("Unauthorized") {
            Self::Auth
        } else if message.contains("429") || message.contains("rate") {
            Self::RateLimited
        } else if message.contains("insufficient") || message.contains("balance") {
            Self::QuotaExceeded
        } else if message.contains("timeout") {
            Self::Timeout
        } else if message.contains("fetch") || message.contains("network") {
            Self::Network
        } else {
            Self::Unknown
        }
    }

    /// The policy table: kind -> surface or degrade.
    pub fn disposition(self) -> Disposition {
        match self {
            Self::Auth => Disposition::Surface(AUTH_ERROR),
            Self::QuotaExceeded => Disposition::Surface(QUOTA_ERROR),
            Self::Timeout => Disposition::Surface(TIMEOUT_ERROR),
            Self::Network => Disposition::Surface(NETWORK_ERROR),
            Self::RateLimited => Disposition::Degrade(busy_reply),
            Self::Unknown => Disposition::Degrade(fallback_reply),
        }
    }
}

/// Reply used when no real API key is configured.
pub fn offline_reply(message: &str) -> String {
    format!(
        "Mock assistant reply: I received your message \"{message}\".\n\n\
         To get real AI responses:\n\
         1. Create an account with your provider (OpenAI or DeepSeek)\n\
         2. Obtain an API key\n\
         3. Set PROVIDER_API_KEY in the environment"
    )
}

/// Reply used when the upstream is rate limiting us.
pub fn busy_reply(message: &str) -> String {
    format!(
        "The system is busy, so here is a mock reply instead.\n\n\
         You said: \"{message}\"\n\n\
         Too many requests right now; try again shortly for a real AI response."
    )
}

/// Reply used for failures we cannot explain to the user.
pub fn fallback_reply(message: &str) -> String {
    format!(
        "Mock assistant: I received your message \"{message}\". \
         The AI service is temporarily unreachable, but I will do my best to help!"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status_code: u16, message: &str) -> CompletionError {
        CompletionError::Http {
            status_code,
            message: message.to_string(),
        }
    }

    // ==================== Structured Classification Tests ====================

    #[test]
    fn test_classify_by_status_code() {
        assert_eq!(
            ErrorKind::classify(&http(401, "Incorrect API key provided")),
            ErrorKind::Auth
        );
        assert_eq!(
            ErrorKind::classify(&http(402, "Insufficient Balance")),
            ErrorKind::QuotaExceeded
        );
        assert_eq!(
            ErrorKind::classify(&http(408, "Request Timeout")),
            ErrorKind::Timeout
        );
        assert_eq!(
            ErrorKind::classify(&http(429, "Too Many Requests")),
            ErrorKind::RateLimited
        );
    }

    #[test]
    fn test_classify_typed_transport_variants() {
        assert_eq!(
            ErrorKind::classify(&CompletionError::Timeout("operation timed out".to_string())),
            ErrorKind::Timeout
        );
        assert_eq!(
            ErrorKind::classify(&CompletionError::Network("connection refused".to_string())),
            ErrorKind::Network
        );
    }

    #[test]
    fn test_classify_unmatched_status_falls_back_to_text() {
        // 500 carries no direct mapping; the body text decides.
        assert_eq!(
            ErrorKind::classify(&http(500, "insufficient capacity")),
            ErrorKind::QuotaExceeded
        );
        assert_eq!(
            ErrorKind::classify(&http(503, "something odd")),
            ErrorKind::Unknown
        );
    }

    // ==================== Substring Shim Tests ====================

    #[test]
    fn test_from_message_one_fixture_per_marker() {
        assert_eq!(ErrorKind::from_message("got 401 from server"), ErrorKind::Auth);
        assert_eq!(ErrorKind::from_message("Unauthorized request"), ErrorKind::Auth);
        assert_eq!(ErrorKind::from_message("status 429"), ErrorKind::RateLimited);
        assert_eq!(
            ErrorKind::from_message("rate limit exceeded"),
            ErrorKind::RateLimited
        );
        assert_eq!(
            ErrorKind::from_message("insufficient quota"),
            ErrorKind::QuotaExceeded
        );
        assert_eq!(
            ErrorKind::from_message("account balance too low"),
            ErrorKind::QuotaExceeded
        );
        assert_eq!(ErrorKind::from_message("read timeout"), ErrorKind::Timeout);
        assert_eq!(ErrorKind::from_message("fetch failed"), ErrorKind::Network);
        assert_eq!(
            ErrorKind::from_message("network unreachable"),
            ErrorKind::Network
        );
        assert_eq!(ErrorKind::from_message("kaboom"), ErrorKind::Unknown);
    }

    #[test]
    fn test_from_message_first_match_wins() {
        // timeout is checked before network
        assert_eq!(
            ErrorKind::from_message("timeout while reading from network"),
            ErrorKind::Timeout
        );
        // 401 is checked before rate
        assert_eq!(
            ErrorKind::from_message("401 while checking rate"),
            ErrorKind::Auth
        );
    }

    #[test]
    fn test_from_message_is_case_sensitive() {
        // "Rate" does not match the lowercase "rate" marker
        assert_eq!(ErrorKind::from_message("Rate limited"), ErrorKind::Unknown);
        // "unauthorized" does not match the capitalized marker
        assert_eq!(
            ErrorKind::from_message("unauthorized request"),
            ErrorKind::Unknown
        );
    }

    // ==================== Disposition Table Tests ====================

    #[test]
    fn test_hard_failures_surface_an_error() {
        for kind in [
            ErrorKind::Auth,
            ErrorKind::QuotaExceeded,
            ErrorKind::Timeout,
            ErrorKind::Network,
        ] {
            assert!(
                matches!(kind.disposition(), Disposition::Surface(_)),
                "{kind:?} should surface"
            );
        }
    }

    #[test]
    fn test_soft_failures_degrade_to_mock_replies() {
        for kind in [ErrorKind::RateLimited, ErrorKind::Unknown] {
            match kind.disposition() {
                Disposition::Degrade(template) => {
                    let reply = template("does pineapple belong on pizza?");
                    assert!(reply.contains("does pineapple belong on pizza?"));
                }
                Disposition::Surface(_) => panic!("{kind:?} should degrade"),
            }
        }
    }

    #[test]
    fn test_replies_echo_the_message_verbatim() {
        for template in [offline_reply, busy_reply, fallback_reply] {
            let reply = template("¿cómo estás?");
            assert!(reply.contains("¿cómo estás?"));
            assert!(!reply.is_empty());
        }
    }
}
