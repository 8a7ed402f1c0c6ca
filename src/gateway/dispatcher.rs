//! Request dispatcher.
//!
//! [`Gateway`] owns the feed cache and the rate limiter and turns a
//! [`RequestEnvelope`] into a [`ResponseEnvelope`]. It never fails: every
//! error, including a panic inside a handler, becomes a JSON error envelope.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use super::client::client_id;
use super::cors::CorsPolicy;
use super::envelope::{Headers, RequestEnvelope, ResponseEnvelope};
use super::error::ApiError;
use super::responses::{
    FeedResponse, HealthResponse, RefreshResponse, REFRESH_MESSAGE,
};
use super::route::Route;
use crate::cache::FeedCache;
use crate::config::Config;
use crate::datetime::now_iso8601;
use crate::error::{GatewayError, Result};
use crate::feed::{resolve, FeedFetcher, FeedSource, HttpFeedSource, NewsItem, DEFAULT_FEED};
use crate::rate_limit::{Admission, FixedWindowLimiter, WindowPolicy};

/// Items for a feed and where they came from.
#[derive(Debug, Clone)]
pub struct LoadedFeed {
    /// Items in source order.
    pub items: Arc<Vec<NewsItem>>,
    /// True when served from a fresh cache entry.
    pub cached: bool,
}

/// The gateway core.
pub struct Gateway {
    fetcher: FeedFetcher,
    cache: FeedCache,
    limiter: FixedWindowLimiter,
    cors: CorsPolicy,
    cache_ttl: Duration,
}

impl Gateway {
    /// Create a gateway fetching through `source`.
    pub fn new(config: &Config, source: Arc<dyn FeedSource>) -> Self {
        Self {
            fetcher: FeedFetcher::new(source, config.cache.max_items_per_feed),
            cache: FeedCache::new(),
            limiter: FixedWindowLimiter::new(WindowPolicy::new(
                config.rate_limit.max_requests,
                config.rate_limit.window_secs,
            )),
            cors: CorsPolicy::new(&config.cors.origins),
            cache_ttl: config.cache.ttl(),
        }
    }

    /// Create a gateway fetching over HTTP.
    pub fn with_http_source(config: &Config) -> Result<Self> {
        let source = HttpFeedSource::new(&config.fetch)?;
        Ok(Self::new(config, Arc::new(source)))
    }

    /// The feed cache.
    pub fn cache(&self) -> &FeedCache {
        &self.cache
    }

    /// The rate limiter.
    pub fn limiter(&self) -> &FixedWindowLimiter {
        &self.limiter
    }

    /// Handle one request.
    pub async fn dispatch(&self, request: RequestEnvelope) -> ResponseEnvelope {
        match AssertUnwindSafe(self.handle(&request)).catch_unwind().await {
            Ok(response) => response,
            Err(_) => {
                error!(
                    method = %request.method,
                    path = %request.path,
                    "Unhandled error while dispatching request"
                );
                self.error_response(ApiError::unexpected(), request.headers.get("Origin"))
            }
        }
    }

    /// Liveness and store sizes. Has no side effects.
    pub fn health(&self) -> ResponseEnvelope {
        self.health_response(None)
    }

    /// Serve `feed_id` from a fresh cache entry, or fetch and cache it.
    ///
    /// Concurrent misses for the same feed each fetch; the last write wins.
    pub async fn load_feed(&self, feed_id: &str) -> Result<LoadedFeed> {
        if let Some(entry) = self.cache.get(feed_id) {
            if entry.is_fresh() {
                debug!(feed = %feed_id, "Cache hit");
                return Ok(LoadedFeed {
                    items: entry.items,
                    cached: true,
                });
            }
        }

        debug!(feed = %feed_id, "Cache miss");
        let url = resolve(feed_id)?;
        let items = self.fetcher.fetch(url, feed_id).await?;
        let entry = self.cache.put(feed_id, items, self.cache_ttl);

        Ok(LoadedFeed {
            items: entry.items,
            cached: false,
        })
    }

    /// Drop `feed_id` from the cache and fetch it again.
    pub async fn refresh_feed(&self, feed_id: &str) -> Result<LoadedFeed> {
        if self.cache.invalidate(feed_id) {
            debug!(feed = %feed_id, "Invalidated cache entry");
        }
        self.load_feed(feed_id).await
    }

    async fn handle(&self, request: &RequestEnvelope) -> ResponseEnvelope {
        let route = Route::parse(&request.method, &request.path);
        let origin = request.headers.get("Origin");

        info!(method = %request.method, path = %request.path, "Handling request");

        if route.is_rate_limited() {
            if let Err(e) = self.check_rate_limit(&client_id(&request.headers)) {
                return self.error_response(e.into(), origin);
            }
        }

        let result = match route {
            Route::Preflight => Ok(ResponseEnvelope::empty(
                200,
                self.cors.preflight_headers(origin),
            )),
            Route::Health => Ok(self.health_response(origin)),
            Route::Feed(feed_id) => self.handle_feed(&feed_id, origin).await,
            Route::Refresh => self.handle_refresh(request.body.as_deref(), origin).await,
            Route::MethodNotAllowed => Err(ApiError::method_not_allowed()),
        };

        result.unwrap_or_else(|e| self.error_response(e, origin))
    }

    fn check_rate_limit(&self, client: &str) -> Result<()> {
        match self.limiter.admit(client) {
            Admission::Admitted => Ok(()),
            Admission::Rejected { retry_after } => {
                warn!(
                    client = %client,
                    reset_in_secs = retry_after.as_secs(),
                    "Rate limit exceeded"
                );
                // Clients are told to wait a full window
                Err(GatewayError::RateLimitExceeded {
                    retry_after: self.limiter.policy().window,
                })
            }
        }
    }

    async fn handle_feed(
        &self,
        feed_id: &str,
        origin: Option<&str>,
    ) -> std::result::Result<ResponseEnvelope, ApiError> {
        let feed = self.load_feed(feed_id).await.map_err(|e| {
            error!(feed = %feed_id, error = %e, "Error handling GET request");
            e
        })?;

        let mut headers = self.cors_headers(origin);
        headers.insert(
            "Cache-Control",
            format!("public, max-age={}", self.cache_ttl.as_secs()),
        );

        let body = FeedResponse {
            success: true,
            feed_type: feed_id,
            count: feed.items.len(),
            data: &feed.items,
            timestamp: now_iso8601(),
            cached: feed.cached,
        };
        Ok(ResponseEnvelope::json(200, headers, &body))
    }

    async fn handle_refresh(
        &self,
        body: Option<&str>,
        origin: Option<&str>,
    ) -> std::result::Result<ResponseEnvelope, ApiError> {
        let feed_id = parse_refresh_body(body).map_err(|e| {
            error!(error = %e, "Error refreshing cache");
            e
        })?;

        let feed = self.refresh_feed(&feed_id).await.map_err(|e| {
            error!(feed = %feed_id, error = %e, "Error refreshing cache");
            e
        })?;

        info!(feed = %feed_id, count = feed.items.len(), "Cache refreshed");

        let body = RefreshResponse {
            success: true,
            message: REFRESH_MESSAGE,
            feed_type: &feed_id,
            count: feed.items.len(),
            timestamp: now_iso8601(),
        };
        Ok(ResponseEnvelope::json(200, self.cors_headers(origin), &body))
    }

    fn health_response(&self, origin: Option<&str>) -> ResponseEnvelope {
        let body = HealthResponse {
            status: "healthy",
            timestamp: now_iso8601(),
            version: env!("CARGO_PKG_VERSION"),
            cache_size: self.cache.len(),
            rate_limit_entries: self.limiter.len(),
        };
        ResponseEnvelope::json(200, self.cors_headers(origin), &body)
    }

    fn error_response(&self, error: ApiError, origin: Option<&str>) -> ResponseEnvelope {
        error.into_envelope(self.cors_headers(origin))
    }

    fn cors_headers(&self, origin: Option<&str>) -> Headers {
        let mut headers = Headers::new();
        self.cors.apply(&mut headers, origin);
        headers
    }
}

/// Feed identifier named by a refresh body.
///
/// A missing or blank body, or a missing, null or empty `feedType`, means
/// the top stories feed. `feedType` is only read from JSON objects; any
/// other JSON value except `null` also means the top stories feed.
fn parse_refresh_body(body: Option<&str>) -> Result<String> {
    let Some(body) = body.map(str::trim).filter(|b| !b.is_empty()) else {
        return Ok(DEFAULT_FEED.to_string());
    };

    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| GatewayError::MalformedRequestBody(e.to_string()))?;

    let feed_type = match &value {
        serde_json::Value::Object(fields) => match fields.get("feedType") {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(feed)) => Some(feed.as_str()),
            Some(other) => {
                return Err(GatewayError::MalformedRequestBody(format!(
                    "feedType must be a string, got {}",
                    other
                )))
            }
        },
        serde_json::Value::Null => {
            return Err(GatewayError::MalformedRequestBody(
                "request body is null".to_string(),
            ))
        }
        _ => None,
    };

    Ok(feed_type
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_FEED)
        .to_string())
}
