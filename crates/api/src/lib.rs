//! API surface
//!
//! Exposes the gateway's GraphQL contract over a single HTTP endpoint:
//! two read-only queries (`hello`, `health`) and the `sendMessage`
//! mutation, which delegates to the message resolver with a freshly built
//! per-request context.

pub mod routes;
pub mod schema;
