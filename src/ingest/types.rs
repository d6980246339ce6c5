//! Feed ingestion types.

use std::fmt;

/// One entry of a fetched feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    /// Headline.
    pub title: String,
    /// Canonical link; becomes the post slug.
    pub link: String,
    /// Plain-text excerpt (HTML stripped, whitespace collapsed).
    pub content_snippet: Option<String>,
    /// Raw body as published.
    pub content: Option<String>,
    /// Enclosure or media URL.
    pub enclosure_url: Option<String>,
}

impl FeedItem {
    /// Create an item with only the required fields.
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            content_snippet: None,
            content: None,
            enclosure_url: None,
        }
    }

    /// Set the plain-text excerpt.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.content_snippet = Some(snippet.into());
        self
    }

    /// Set the raw body.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the enclosure URL.
    pub fn with_enclosure(mut self, url: impl Into<String>) -> Self {
        self.enclosure_url = Some(url.into());
        self
    }
}

/// Outcome of one fetch-and-save cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Items returned by the feed.
    pub fetched: usize,
    /// Posts created.
    pub inserted: usize,
    /// Items whose slug already existed.
    pub skipped: usize,
    /// Items whose lookup or insert failed.
    pub failed: usize,
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fetched={} inserted={} skipped={} failed={}",
            self.fetched, self.inserted, self.skipped, self.failed
        )
    }
}
