//! Success payloads.

use serde::Serialize;

use crate::feed::NewsItem;

/// Body of `GET /api/feeds/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse<'a> {
    /// Always true.
    pub success: bool,
    /// Feed identifier.
    pub feed_type: &'a str,
    /// Number of items in `data`.
    pub count: usize,
    /// Items in source order.
    pub data: &'a [NewsItem],
    /// Response time.
    pub timestamp: String,
    /// Whether the items came from a fresh cache entry.
    pub cached: bool,
}

/// Body of `POST /api/feeds/refresh`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse<'a> {
    /// Always true.
    pub success: bool,
    /// Confirmation message.
    pub message: &'static str,
    /// Feed identifier that was refreshed.
    pub feed_type: &'a str,
    /// Number of items fetched.
    pub count: usize,
    /// Response time.
    pub timestamp: String,
}

/// Message returned after a refresh.
pub const REFRESH_MESSAGE: &str = "Cache refreshed successfully";

/// Body of `GET /api/health`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always `"healthy"`.
    pub status: &'static str,
    /// Response time.
    pub timestamp: String,
    /// Crate version.
    pub version: &'static str,
    /// Number of cached feeds.
    pub cache_size: usize,
    /// Number of tracked rate-limit windows.
    pub rate_limit_entries: usize,
}
