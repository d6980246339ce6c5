//! RSS ingestion for Gazette.
//!
//! A scheduled job pulls one external feed and inserts every item whose link
//! is not yet the slug of a stored post. Existing posts are never touched.

mod fetcher;
mod job;
mod scheduler;
mod types;

pub use fetcher::{parse_feed, strip_html, FeedSource, HttpFeedSource};
pub use job::{build_post, IngestJob};
pub use scheduler::{parse_schedule, IngestHandle, IngestScheduler};
pub use types::{CycleReport, FeedItem};

/// Feed ingested when none is configured.
pub const DEFAULT_FEED_URL: &str = "https://www.hurriyet.com.tr/rss/anasayfa";

/// Top of every hour.
pub const DEFAULT_SCHEDULE: &str = "0 * * * *";

/// Category given to every ingested post.
pub const INGEST_CATEGORY: &str = "worldnews";

/// Image used when a feed item has no enclosure.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/600x400";
