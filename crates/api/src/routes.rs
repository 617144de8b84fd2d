use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;

use crate::schema::GatewaySchema;

/// Execute a GraphQL operation.
pub async fn graphql_handler(
    State(schema): State<GatewaySchema>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

/// GraphiQL landing page served on GET.
pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Build the application router.
///
/// One endpoint serves everything: POST executes operations, GET serves
/// the landing page. CORS mirrors the request origin with credentials
/// allowed, matching the permissive policy of the served contract.
pub fn build_router(schema: GatewaySchema) -> Router {
    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .layer(CorsLayer::very_permissive())
        .with_state(schema)
}
