//! Upstream feed retrieval.
//!
//! [`FeedSource`] is the capability that turns a URL into a parsed feed.
//! [`HttpFeedSource`] implements it over HTTP with size and time limits,
//! delegating XML parsing to `feed-rs`.

use std::time::Duration;

use axum::async_trait;
use feed_rs::parser;
use reqwest::Client;

use crate::config::FetchConfig;
use crate::error::{GatewayError, Result};
use crate::feed::types::{ParsedFeed, ParsedItem};

/// Something that can fetch and parse a feed.
///
/// Failures are reported as [`GatewayError::FetchOrParse`].
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the feed at `url` and parse it.
    async fn fetch(&self, url: &str) -> Result<ParsedFeed>;
}

/// HTTP feed source with timeouts and a size cap.
pub struct HttpFeedSource {
    client: Client,
    max_feed_size: u64,
}

impl HttpFeedSource {
    /// Create a new source from fetch settings.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .timeout(Duration::from_secs(config.total_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_feed_size: config.max_feed_size_bytes,
        })
    }

    fn too_large(&self, size: u64) -> GatewayError {
        GatewayError::FetchOrParse(format!(
            "feed too large: {} bytes (max {} bytes)",
            size, self.max_feed_size
        ))
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<ParsedFeed> {
        validate_url(url)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GatewayError::FetchOrParse(format!("failed to fetch feed: {}", e)))?;

        if !response.status().is_success() {
            return Err(GatewayError::FetchOrParse(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_feed_size {
                return Err(self.too_large(content_length));
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::FetchOrParse(format!("failed to read response: {}", e)))?;

        // Content-Length may be absent or wrong
        if bytes.len() as u64 > self.max_feed_size {
            return Err(self.too_large(bytes.len() as u64));
        }

        parse_feed(&bytes)
    }
}

/// Check that a feed URL is an absolute http(s) URL with a host.
pub fn validate_url(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url)
        .map_err(|e| GatewayError::FetchOrParse(format!("invalid URL: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(GatewayError::FetchOrParse(format!(
                "unsupported URL scheme: {}",
                scheme
            )));
        }
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(GatewayError::FetchOrParse("URL has no host".to_string()));
    }

    Ok(())
}

/// Parse RSS or Atom bytes into a [`ParsedFeed`].
pub fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed> {
    let feed = parser::parse(bytes)
        .map_err(|e| GatewayError::FetchOrParse(format!("failed to parse feed: {}", e)))?;

    let items = feed
        .entries
        .into_iter()
        .map(|entry| ParsedItem {
            guid: Some(entry.id).filter(|id| !id.is_empty()),
            title: entry.title.map(|t| t.content),
            link: entry.links.into_iter().next().map(|l| l.href),
            summary: entry.summary.map(|t| t.content),
            content: entry.content.and_then(|c| c.body),
            published_at: entry.published.or(entry.updated),
        })
        .collect();

    Ok(ParsedFeed {
        title: feed.title.map(|t| t.content),
        items,
    })
}
