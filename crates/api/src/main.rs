use api::{routes::build_router, schema::build_schema};
use config::{GatewayConfig, LoggingConfig};
use services::ContextFactory;

#[tokio::main]
async fn main() {
    // .env is optional; real deployments configure the environment directly
    dotenvy::dotenv().ok();

    let config = GatewayConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {e}");
        std::process::exit(1);
    });

    init_tracing(&config.logging);

    if !config.provider.has_usable_key() {
        tracing::warn!(
            "no provider API key configured; sendMessage will serve mock replies until PROVIDER_API_KEY is set"
        );
    }

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let schema = build_schema(ContextFactory::new(config.provider.clone()));
    let app = build_router(schema);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Failed to bind {bind_address}: {e}");
            std::process::exit(1);
        });

    tracing::info!(address = %bind_address, "Server started successfully");
    tracing::info!(
        provider = ?config.provider.kind,
        model = %config.provider.model,
        base_url = %config.provider.base_url,
        "Upstream provider configured"
    );
    tracing::info!("API Endpoints:");
    tracing::info!("  - POST /graphql (queries and mutations)");
    tracing::info!("  - GET /graphql (GraphiQL landing page)");

    axum::serve(listener, app).await.unwrap();
}

fn init_tracing(logging_config: &LoggingConfig) {
    let filter = logging_config.level.clone();

    // Initialize tracing based on the format specified in config
    match logging_config.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .init();
        }
        "compact" => {
            tracing_subscriber::fmt()
                .compact()
                .with_env_filter(filter)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .init();
        }
    }
}
