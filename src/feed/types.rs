//! Feed types for newsgate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when an item has none.
pub const DEFAULT_TITLE: &str = "No title";

/// Description used when an item has neither summary nor content.
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// Link used when an item has none.
pub const DEFAULT_LINK: &str = "#";

/// Source name used when the feed has no title.
pub const DEFAULT_SOURCE_NAME: &str = "Google News";

/// A normalized news item as served to clients.
///
/// Field names on the wire follow the reader frontend (`pubDate`, `guid`, `source`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Headline.
    pub title: String,
    /// Plain-text snippet.
    pub description: String,
    /// Link to the article.
    pub link: String,
    /// Publication time, RFC 3339.
    #[serde(rename = "pubDate")]
    pub published_at: String,
    /// Stable deduplication key.
    #[serde(rename = "guid")]
    pub identifier: String,
    /// Name of the feed the item came from.
    #[serde(rename = "source")]
    pub source_name: String,
    /// Feed identifier the item was requested under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A feed as returned by a [`FeedSource`](crate::feed::FeedSource), before normalization.
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    /// Feed title.
    pub title: Option<String>,
    /// Entries in source order.
    pub items: Vec<ParsedItem>,
}

/// A raw feed entry.
#[derive(Debug, Clone, Default)]
pub struct ParsedItem {
    /// RSS guid or Atom id, when the source supplied one.
    pub guid: Option<String>,
    /// Item title.
    pub title: Option<String>,
    /// First link of the entry.
    pub link: Option<String>,
    /// Summary / RSS description, possibly HTML.
    pub summary: Option<String>,
    /// Full content body, possibly HTML.
    pub content: Option<String>,
    /// Published (or last updated) time.
    pub published_at: Option<DateTime<Utc>>,
}

impl ParsedItem {
    /// Create an item with only a title and link.
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            link: Some(link.into()),
            ..Self::default()
        }
    }

    /// Set the guid.
    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.guid = Some(guid.into());
        self
    }

    /// Set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Set the published time.
    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }
}
