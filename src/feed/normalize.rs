//! Normalization of parsed feeds into [`NewsItem`]s.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{debug, error};

use crate::datetime::{now_iso8601, to_iso8601};
use crate::error::{GatewayError, Result};
use crate::feed::fetcher::FeedSource;
use crate::feed::types::{
    NewsItem, ParsedFeed, ParsedItem, DEFAULT_DESCRIPTION, DEFAULT_LINK, DEFAULT_SOURCE_NAME,
    DEFAULT_TITLE,
};

/// Fetches a feed through a [`FeedSource`] and normalizes the result.
#[derive(Clone)]
pub struct FeedFetcher {
    source: Arc<dyn FeedSource>,
    max_items: usize,
}

impl FeedFetcher {
    /// Create a fetcher that keeps at most `max_items` items per feed.
    pub fn new(source: Arc<dyn FeedSource>, max_items: usize) -> Self {
        Self { source, max_items }
    }

    /// Maximum number of items returned per feed.
    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Fetch `url` and normalize its items under `category`.
    ///
    /// Any failure is reported as [`GatewayError::FetchOrParse`]; nothing is
    /// returned for a feed that failed partway.
    pub async fn fetch(&self, url: &str, category: &str) -> Result<Vec<NewsItem>> {
        let feed = self.source.fetch(url).await.map_err(|e| {
            error!(url = %url, error = %e, "Error parsing feed");
            match e {
                GatewayError::FetchOrParse(msg) => GatewayError::FetchOrParse(msg),
                other => GatewayError::FetchOrParse(other.to_string()),
            }
        })?;

        let items = normalize(feed, category, self.max_items);
        debug!(category = %category, count = items.len(), "Normalized feed");
        Ok(items)
    }
}

/// Map a parsed feed to at most `max_items` news items, in source order.
pub fn normalize(feed: ParsedFeed, category: &str, max_items: usize) -> Vec<NewsItem> {
    let source_name = non_empty(feed.title).unwrap_or_else(|| DEFAULT_SOURCE_NAME.to_string());

    feed.items
        .into_iter()
        .take(max_items)
        .map(|item| normalize_item(item, &source_name, category))
        .collect()
}

fn normalize_item(item: ParsedItem, source_name: &str, category: &str) -> NewsItem {
    let identifier = match non_empty(item.guid) {
        Some(guid) => guid,
        None => link_digest(item.link.as_deref().unwrap_or("")),
    };

    let description = item
        .summary
        .map(|s| html_to_text(&s))
        .filter(|s| !s.is_empty())
        .or_else(|| {
            item.content
                .map(|c| html_to_text(&c))
                .filter(|c| !c.is_empty())
        })
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

    NewsItem {
        title: non_empty(item.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        description,
        link: non_empty(item.link).unwrap_or_else(|| DEFAULT_LINK.to_string()),
        published_at: item
            .published_at
            .map(|dt| to_iso8601(&dt))
            .unwrap_or_else(now_iso8601),
        identifier,
        source_name: source_name.to_string(),
        category: Some(category.to_string()),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Hex SHA-256 of a link, used as the identifier of items without a guid.
pub fn link_digest(link: &str) -> String {
    format!("{:x}", Sha256::digest(link.as_bytes()))
}

/// Reduce an HTML fragment to plain text.
///
/// Tags become word breaks, common and numeric entities are decoded, and
/// runs of whitespace collapse to a single space.
pub fn html_to_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(ch) = rest.chars().next() {
        match ch {
            '<' => match rest.find('>') {
                Some(end) => {
                    text.push(' ');
                    rest = &rest[end + 1..];
                }
                None => {
                    text.push('<');
                    rest = &rest[1..];
                }
            },
            '&' => match decode_entity(rest) {
                Some((decoded, len)) => {
                    text.push(decoded);
                    rest = &rest[len..];
                }
                None => {
                    text.push('&');
                    rest = &rest[1..];
                }
            },
            _ => {
                text.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode the entity at the start of `s` (which begins with `&`).
///
/// Returns the character and the number of bytes consumed, including `;`.
fn decode_entity(s: &str) -> Option<(char, usize)> {
    let semi = s.get(..12).unwrap_or(s).find(';')?;
    let name = &s[1..semi];

    let decoded = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        _ => {
            let code = if let Some(hex) = name
                .strip_prefix("#x")
                .or_else(|| name.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)?
        }
    };

    Some((decoded, semi + 1))
}
