//! Gateway services
//!
//! Home of the message resolver: the single layer that turns an inbound
//! chat message into a terminal result. All upstream failures are absorbed
//! here; nothing above this crate ever sees an error escape.

pub mod chat;

pub use chat::{
    send_message, ChatOutcome, ContextFactory, RequestContext, EMPTY_MESSAGE_ERROR,
    MAX_MESSAGE_CHARS, MESSAGE_TOO_LONG_ERROR, NO_RESPONSE_PLACEHOLDER,
};
