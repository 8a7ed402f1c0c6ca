//! Feed resolution, retrieval and normalization.

pub mod fetcher;
pub mod normalize;
pub mod sources;
pub mod types;

pub use fetcher::{parse_feed, validate_url, FeedSource, HttpFeedSource};
pub use normalize::{html_to_text, link_digest, normalize, FeedFetcher};
pub use sources::{feed_ids, resolve, DEFAULT_FEED};
pub use types::{NewsItem, ParsedFeed, ParsedItem};
