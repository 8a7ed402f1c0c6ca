//! Error envelopes returned by the dispatcher.

use std::time::Duration;

use serde::Serialize;

use super::cors::ALLOWED_METHODS;
use super::envelope::{Headers, ResponseEnvelope};
use crate::error::GatewayError;

/// Methods listed in a 405 body.
const ALLOWED_METHOD_LIST: [&str; 3] = ["GET", "POST", "OPTIONS"];

/// Message used when dispatch fails unexpectedly.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Method not allowed (405).
    MethodNotAllowed,
    /// Too many requests (429).
    TooManyRequests,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCode::MethodNotAllowed => 405,
            ErrorCode::TooManyRequests => 429,
            ErrorCode::InternalError => 500,
        }
    }

    /// Short error title used as the `error` field.
    pub fn title(&self) -> &'static str {
        match self {
            ErrorCode::MethodNotAllowed => "Method not allowed",
            ErrorCode::TooManyRequests => "Rate limit exceeded",
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Short error title.
    pub error: &'static str,
    /// Human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Methods the endpoint accepts (only present for 405).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_methods: Option<Vec<&'static str>>,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: Option<String>,
    retry_after: Option<Duration>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
            retry_after: None,
        }
    }

    /// Create a method not allowed error.
    pub fn method_not_allowed() -> Self {
        Self {
            code: ErrorCode::MethodNotAllowed,
            message: None,
            retry_after: None,
        }
    }

    /// Create a rate limit error advertising `retry_after`.
    pub fn too_many_requests(retry_after: Duration) -> Self {
        Self {
            code: ErrorCode::TooManyRequests,
            message: Some("Too many requests. Please try again later.".to_string()),
            retry_after: Some(retry_after),
        }
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Create the error returned when dispatch panics.
    pub fn unexpected() -> Self {
        Self::internal(UNEXPECTED_ERROR_MESSAGE)
    }

    /// The error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Build the response envelope, on top of `headers`.
    pub fn into_envelope(self, mut headers: Headers) -> ResponseEnvelope {
        match self.code {
            ErrorCode::MethodNotAllowed => headers.insert("Allow", ALLOWED_METHODS),
            ErrorCode::TooManyRequests => {
                if let Some(retry_after) = self.retry_after {
                    // Round up so clients never retry before the reset
                    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                    headers.insert("Retry-After", secs.to_string());
                }
            }
            ErrorCode::InternalError => {}
        }

        let body = ErrorBody {
            error: self.code.title(),
            message: self.message,
            allowed_methods: (self.code == ErrorCode::MethodNotAllowed)
                .then(|| ALLOWED_METHOD_LIST.to_vec()),
        };
        ResponseEnvelope::json(self.code.status_code(), headers, &body)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{:?}: {}", self.code, message),
            None => write!(f, "{:?}", self.code),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::RateLimitExceeded { retry_after } => {
                ApiError::too_many_requests(retry_after)
            }
            // Unknown feeds surface as 500 rather than 404
            other => ApiError::internal(other.to_string()),
        }
    }
}
