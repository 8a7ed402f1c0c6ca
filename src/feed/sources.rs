//! Known feeds and their upstream URLs.

use crate::error::{GatewayError, Result};

/// Feed served when a request names none.
pub const DEFAULT_FEED: &str = "top";

/// Google News RSS feeds by identifier.
const GOOGLE_NEWS_FEEDS: [(&str, &str); 6] = [
    (
        "top",
        "https://news.google.com/rss?hl=en-US&gl=US&ceid=US:en",
    ),
    (
        "technology",
        "https://news.google.com/rss/topics/CAAqJggKIiBDQkFTRWdvSUwyMHZNRFp0Y0RvU0FtVnVHZ0pWVXlnQVAB?hl=en-US&gl=US&ceid=US:en",
    ),
    (
        "business",
        "https://news.google.com/rss/topics/CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx1YlhNU0FtVnVHZ0pWVXlnQVAB?hl=en-US&gl=US&ceid=US:en",
    ),
    (
        "health",
        "https://news.google.com/rss/topics/CAAqIQgKIhtDQkFTRGdvSUwyMHZNR3QwTlRFU0FtVnVLQUFQAQ?hl=en-US&gl=US&ceid=US:en",
    ),
    (
        "science",
        "https://news.google.com/rss/topics/CAAqKggKIiRDQkFTRlFvSUwyMHZNRFp0Y0RvU0FtVnVHZ0pWVXlnQVAB?hl=en-US&gl=US&ceid=US:en",
    ),
    (
        "sports",
        "https://news.google.com/rss/topics/CAAqJggKIiBDQkFTRWdvSUwyMHZNRFp1ZEdvU0FtVnVHZ0pWVXlnQVAB?hl=en-US&gl=US&ceid=US:en",
    ),
];

/// Resolve a feed identifier to its upstream URL.
///
/// Matching is exact and case-sensitive.
pub fn resolve(feed_id: &str) -> Result<&'static str> {
    GOOGLE_NEWS_FEEDS
        .iter()
        .find(|(id, _)| *id == feed_id)
        .map(|(_, url)| *url)
        .ok_or_else(|| GatewayError::UnknownFeed(feed_id.to_string()))
}

/// All known feed identifiers, in display order.
pub fn feed_ids() -> impl Iterator<Item = &'static str> {
    GOOGLE_NEWS_FEEDS.iter().map(|(id, _)| *id)
}
