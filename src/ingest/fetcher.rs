//! Feed fetcher.
//!
//! One HTTP GET per call, bounded by timeouts and a size limit, parsed with
//! feed-rs into a flat list of items.

use std::time::Duration;

use async_trait::async_trait;
use feed_rs::parser;
use reqwest::Client;
use tracing::debug;

use super::types::FeedItem;
use crate::config::IngestConfig;
use crate::{GazetteError, Result};

/// User agent string for feed fetching.
const USER_AGENT: &str = concat!("Gazette/", env!("CARGO_PKG_VERSION"), " (RSS ingest)");

/// Source of feed items for one ingestion cycle.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch and parse the feed.
    async fn fetch(&self) -> Result<Vec<FeedItem>>;
}

/// Fetches a feed over HTTP.
pub struct HttpFeedSource {
    client: Client,
    url: String,
    max_feed_size: u64,
    max_content_length: usize,
}

impl HttpFeedSource {
    /// Build a fetcher from the ingestion configuration.
    pub fn from_config(config: &IngestConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .timeout(Duration::from_secs(config.total_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GazetteError::Feed(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.feed_url.clone(),
            max_feed_size: config.max_feed_size_bytes,
            max_content_length: config.max_content_length,
        })
    }

    /// The feed URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<Vec<FeedItem>> {
        debug!(url = %self.url, "Fetching feed");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| GazetteError::Feed(format!("failed to fetch feed: {e}")))?;

        if !response.status().is_success() {
            return Err(GazetteError::Feed(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_feed_size {
                return Err(GazetteError::Feed(format!(
                    "feed too large: {} bytes (max {} bytes)",
                    content_length, self.max_feed_size
                )));
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GazetteError::Feed(format!("failed to read response: {e}")))?;

        if bytes.len() as u64 > self.max_feed_size {
            return Err(GazetteError::Feed(format!(
                "feed too large: {} bytes (max {} bytes)",
                bytes.len(),
                self.max_feed_size
            )));
        }

        parse_feed(&bytes, self.max_content_length)
    }
}

/// Parse RSS or Atom bytes into feed items, in document order.
///
/// Entries without a link or title are dropped.
pub fn parse_feed(bytes: &[u8], max_content_length: usize) -> Result<Vec<FeedItem>> {
    let feed = parser::parse(bytes)
        .map_err(|e| GazetteError::Feed(format!("failed to parse feed: {e}")))?;

    let items = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let link = entry
                .links
                .first()
                .map(|l| l.href.trim().to_string())
                .filter(|l| !l.is_empty())?;
            let title = entry
                .title
                .map(|t| t.content.trim().to_string())
                .filter(|t| !t.is_empty())?;

            let content = entry.content.and_then(|c| c.body);
            let summary = entry.summary.map(|s| s.content);
            let content_snippet = summary
                .as_deref()
                .or(content.as_deref())
                .map(|text| truncate(&strip_html(text), max_content_length))
                .filter(|s| !s.is_empty());

            let enclosure_url = entry.media.iter().find_map(|media| {
                media
                    .content
                    .iter()
                    .find_map(|c| c.url.as_ref().map(|u| u.to_string()))
                    .or_else(|| media.thumbnails.first().map(|t| t.image.uri.clone()))
            });

            Some(FeedItem {
                title,
                link,
                content_snippet,
                content: summary.or(content),
                enclosure_url,
            })
        })
        .collect();

    Ok(items)
}

/// Tags that start a new line of text. Every other tag is dropped in place.
const BLOCK_TAGS: [&str; 22] = [
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption", "h1", "h2",
    "h3", "h4", "h5", "h6", "hr", "li", "ol", "p", "pre", "tr", "ul",
];

fn is_block_tag(tag: &str) -> bool {
    let name: String = tag
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCK_TAGS.contains(&name.as_str())
}

/// Strip HTML tags and decode common entities, collapsing whitespace.
///
/// Inline tags vanish without a trace; block tags and `<br>` separate words.
/// An `&` that never reaches its `;` is kept as literal text.
pub fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut tag = String::new();
    let mut in_entity = false;
    let mut entity = String::new();

    for ch in html.chars() {
        if in_tag {
            if ch == '>' {
                in_tag = false;
                if is_block_tag(&tag) {
                    result.push(' ');
                }
            } else {
                tag.push(ch);
            }
            continue;
        }

        match ch {
            '<' => {
                if in_entity {
                    in_entity = false;
                    result.push('&');
                    result.push_str(&entity);
                }
                in_tag = true;
                tag.clear();
            }
            '&' => {
                if in_entity {
                    result.push('&');
                    result.push_str(&entity);
                }
                in_entity = true;
                entity.clear();
            }
            ';' if in_entity => {
                in_entity = false;
                push_entity(&mut result, &entity);
            }
            _ if in_entity => {
                if ch.is_whitespace() {
                    in_entity = false;
                    result.push('&');
                    result.push_str(&entity);
                    result.push(ch);
                } else {
                    entity.push(ch);
                }
            }
            _ => result.push(ch),
        }
    }
    if in_entity {
        result.push('&');
        result.push_str(&entity);
    }

    result.split_whitespace().collect::<Vec<&str>>().join(" ")
}

fn push_entity(out: &mut String, entity: &str) {
    match entity {
        "amp" => out.push('&'),
        "lt" => out.push('<'),
        "gt" => out.push('>'),
        "quot" => out.push('"'),
        "apos" => out.push('\''),
        "nbsp" => out.push(' '),
        _ if entity.starts_with('#') => {
            if let Some(c) = parse_numeric_entity(entity).and_then(char::from_u32) {
                out.push(c);
            }
        }
        _ => {
            out.push('&');
            out.push_str(entity);
            out.push(';');
        }
    }
}

/// Parse a numeric HTML entity (e.g., "#123" or "#x7B").
fn parse_numeric_entity(entity: &str) -> Option<u32> {
    if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        u32::from_str_radix(hex, 16).ok()
    } else {
        entity.strip_prefix('#')?.parse().ok()
    }
}

/// Truncate text to at most `max_chars` characters.
fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
