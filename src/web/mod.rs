//! HTTP adapter for the gateway.
//!
//! Converts axum requests to [`RequestEnvelope`](crate::gateway::RequestEnvelope)s,
//! hands them to the [`Gateway`](crate::gateway::Gateway) and writes the
//! response envelope back.

pub mod convert;
pub mod router;
pub mod server;

pub use convert::request_envelope;
pub use router::create_router;
pub use server::WebServer;
