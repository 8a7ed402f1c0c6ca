//! Test helpers for gateway tests.
//!
//! Provides a stub feed source and constructors for a gateway wired to it.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::async_trait;
use chrono::{TimeZone, Utc};

use newsgate::feed::{FeedSource, ParsedFeed, ParsedItem};
use newsgate::{Config, Gateway, GatewayError, Result};

/// Feed source that serves generated items without touching the network.
pub struct StubSource {
    items: AtomicUsize,
    fail: AtomicBool,
    panic: AtomicBool,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl StubSource {
    /// A source returning `items` items per fetch.
    pub fn new(items: usize) -> Self {
        Self {
            items: AtomicUsize::new(items),
            fail: AtomicBool::new(false),
            panic: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
        }
    }

    /// A source whose fetches fail.
    pub fn failing() -> Self {
        let source = Self::new(0);
        source.set_failing(true);
        source
    }

    /// A source whose fetches panic.
    pub fn panicking() -> Self {
        let source = Self::new(0);
        source.panic.store(true, Ordering::SeqCst);
        source
    }

    /// Change the number of items returned by later fetches.
    pub fn set_items(&self, items: usize) {
        self.items.store(items, Ordering::SeqCst);
    }

    /// Make later fetches fail or succeed.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of fetches so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// URLs fetched so far, in order.
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedSource for StubSource {
    async fn fetch(&self, url: &str) -> Result<ParsedFeed> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());

        if self.panic.load(Ordering::SeqCst) {
            panic!("stub source panicked");
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(GatewayError::FetchOrParse("HTTP error: 503".to_string()));
        }

        let published = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let items = (0..self.items.load(Ordering::SeqCst))
            .map(|i| {
                ParsedItem::new(
                    format!("Story {i} (fetch {call})"),
                    format!("https://example.com/story/{i}"),
                )
                .with_guid(format!("guid-{i}"))
                .with_summary(format!("<p>Summary {i}</p>"))
                .with_published_at(published)
            })
            .collect();

        Ok(ParsedFeed {
            title: Some("Top stories - Google News".to_string()),
            items,
        })
    }
}

/// Default configuration for tests.
pub fn test_config() -> Config {
    Config::default()
}

/// A gateway over a stub source returning `items` items.
pub fn stub_gateway(items: usize) -> (Gateway, Arc<StubSource>) {
    gateway_with(&test_config(), StubSource::new(items))
}

/// A gateway over the given source.
pub fn gateway_with(config: &Config, source: StubSource) -> (Gateway, Arc<StubSource>) {
    let source = Arc::new(source);
    let gateway = Gateway::new(config, source.clone());
    (gateway, source)
}
