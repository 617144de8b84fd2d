use async_graphql::{Context, EmptySubscription, Object, Schema, SimpleObject};
use chrono::Utc;
use services::ContextFactory;

const GREETING: &str = "Hello from AI Chat Backend!";

/// Result of the `sendMessage` mutation.
///
/// `error` is null on success and on degraded mock replies; it is only
/// populated for failures the user can act on.
#[derive(Debug, Clone, SimpleObject)]
pub struct ChatResult {
    pub response: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Fixed greeting, usable as a liveness probe.
    async fn hello(&self) -> &'static str {
        GREETING
    }

    /// Service health with the current UTC timestamp and crate version.
    async fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Forward one chat message to the upstream provider.
    ///
    /// Always resolves to a `ChatResult`; upstream failures are reported
    /// through its `error` field, never as GraphQL errors.
    async fn send_message(&self, ctx: &Context<'_>, message: String) -> ChatResult {
        let request_ctx = ctx.data_unchecked::<ContextFactory>().make();
        let outcome = services::send_message(&request_ctx, &message).await;
        ChatResult {
            response: outcome.response,
            error: outcome.error,
        }
    }
}

pub type GatewaySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(factory: ContextFactory) -> GatewaySchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(factory)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{ProviderKind, ProviderSettings, PLACEHOLDER_API_KEY};
    use std::sync::Arc;
    use upstream::{CompletionError, MockProvider};

    fn schema_with(provider: Arc<MockProvider>) -> GatewaySchema {
        let settings = ProviderSettings::for_kind(ProviderKind::OpenAi, "sk-test-key");
        build_schema(ContextFactory::with_provider(settings, provider))
    }

    #[tokio::test]
    async fn test_hello_query() {
        let schema = schema_with(Arc::new(MockProvider::new()));
        let response = schema.execute("{ hello }").await;

        assert!(response.errors.is_empty());
        let data = response.data.into_json().unwrap();
        assert_eq!(data["hello"], GREETING);
    }

    #[tokio::test]
    async fn test_health_query() {
        let schema = schema_with(Arc::new(MockProvider::new()));
        let before = Utc::now();
        let response = schema.execute("{ health { status timestamp version } }").await;

        assert!(response.errors.is_empty());
        let data = response.data.into_json().unwrap();
        assert_eq!(data["health"]["status"], "healthy");
        assert_eq!(data["health"]["version"], env!("CARGO_PKG_VERSION"));

        let timestamp = chrono::DateTime::parse_from_rfc3339(
            data["health"]["timestamp"].as_str().unwrap(),
        )
        .unwrap();
        let age = Utc::now().signed_duration_since(timestamp);
        assert!(timestamp >= before - chrono::Duration::seconds(1));
        assert!(age.num_seconds() < 5);
    }

    #[tokio::test]
    async fn test_send_message_mutation_success() {
        let provider = Arc::new(MockProvider::with_reply("The capital is Paris."));
        let schema = schema_with(provider.clone());

        let response = schema
            .execute(r#"mutation { sendMessage(message: "capital of France?") { response error } }"#)
            .await;

        assert!(response.errors.is_empty());
        let data = response.data.into_json().unwrap();
        assert_eq!(data["sendMessage"]["response"], "The capital is Paris.");
        assert_eq!(data["sendMessage"]["error"], serde_json::Value::Null);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_send_message_empty_input_is_a_result_not_a_graphql_error() {
        let provider = Arc::new(MockProvider::new());
        let schema = schema_with(provider.clone());

        let response = schema
            .execute(r#"mutation { sendMessage(message: "   ") { response error } }"#)
            .await;

        assert!(response.errors.is_empty());
        let data = response.data.into_json().unwrap();
        assert_eq!(data["sendMessage"]["response"], "");
        assert_eq!(data["sendMessage"]["error"], "Message cannot be empty");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_send_message_upstream_failure_stays_http_level_success() {
        let provider = Arc::new(MockProvider::new());
        provider.push_error(CompletionError::Http {
            status_code: 401,
            message: "Incorrect API key provided".to_string(),
        });
        let schema = schema_with(provider);

        let response = schema
            .execute(r#"mutation { sendMessage(message: "hi") { response error } }"#)
            .await;

        // The failure lives in the payload, not in the GraphQL error list.
        assert!(response.errors.is_empty());
        let data = response.data.into_json().unwrap();
        assert_eq!(data["sendMessage"]["response"], "");
        assert!(data["sendMessage"]["error"]
            .as_str()
            .unwrap()
            .contains("API key"));
    }

    #[tokio::test]
    async fn test_send_message_without_key_returns_mock_reply() {
        let provider = Arc::new(MockProvider::new());
        let settings = ProviderSettings::for_kind(ProviderKind::OpenAi, PLACEHOLDER_API_KEY);
        let schema = build_schema(ContextFactory::with_provider(settings, provider.clone()));

        let response = schema
            .execute(r#"mutation { sendMessage(message: "ping") { response error } }"#)
            .await;

        assert!(response.errors.is_empty());
        let data = response.data.into_json().unwrap();
        assert!(data["sendMessage"]["response"].as_str().unwrap().contains("ping"));
        assert_eq!(data["sendMessage"]["error"], serde_json::Value::Null);
        assert_eq!(provider.call_count(), 0);
    }
}
