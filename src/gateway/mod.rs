//! Transport-agnostic request handling.

pub mod client;
pub mod cors;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod responses;
pub mod route;

pub use client::{client_id, REMOTE_ADDR_HEADER};
pub use cors::CorsPolicy;
pub use dispatcher::{Gateway, LoadedFeed};
pub use envelope::{Headers, RequestEnvelope, ResponseEnvelope};
pub use error::{ApiError, ErrorCode};
pub use route::Route;
