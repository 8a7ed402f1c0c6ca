//! newsgate - News Feed Gateway
//!
//! Serves Google News RSS feeds as normalized JSON, with an in-memory TTL
//! cache and per-client fixed-window rate limiting in front of the upstream
//! fetch.

pub mod cache;
pub mod config;
pub mod datetime;
pub mod error;
pub mod feed;
pub mod gateway;
pub mod logging;
pub mod rate_limit;
pub mod web;

pub use cache::{CachedFeed, FeedCache};
pub use config::Config;
pub use error::{GatewayError, Result};
pub use feed::{FeedFetcher, FeedSource, HttpFeedSource, NewsItem, ParsedFeed, ParsedItem};
pub use gateway::{Gateway, Headers, RequestEnvelope, ResponseEnvelope};
pub use rate_limit::{Admission, FixedWindowLimiter, RateWindow, WindowPolicy};
pub use web::WebServer;
