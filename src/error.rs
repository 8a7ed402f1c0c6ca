//! Error types for newsgate.

use std::time::Duration;

use thiserror::Error;

/// Common error type for newsgate.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The feed identifier is not one of the known feeds.
    #[error("Unknown feed type: {0}")]
    UnknownFeed(String),

    /// Network, timeout, HTTP status or XML failure while loading a feed.
    ///
    /// No partial results accompany this error; a feed is loaded whole or not at all.
    #[error("Failed to parse RSS feed: {0}")]
    FetchOrParse(String),

    /// A request body that is not valid JSON for the endpoint.
    #[error("Malformed request body: {0}")]
    MalformedRequestBody(String),

    /// The client used up its request window.
    #[error("rate limit exceeded, retry in {}s", retry_after.as_secs())]
    RateLimitExceeded {
        /// Time until the client's window resets.
        retry_after: Duration,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for newsgate operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
