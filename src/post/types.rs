//! Post model for Gazette.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

/// Category assigned to posts created without one.
pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// Cover image assigned to authored posts created without one.
pub const DEFAULT_POST_IMAGE: &str =
    "https://images.pexels.com/photos/723072/pexels-photo-723072.jpeg?auto=compress&cs=tinysrgb&w=600";

/// Default page size for post listings.
pub const DEFAULT_POST_LIMIT: i64 = 9;

/// A published post.
#[derive(Debug, Clone)]
pub struct Post {
    /// Unique post ID.
    pub id: i64,
    /// Authoring user; `None` for ingested posts.
    pub author_id: Option<i64>,
    /// Headline.
    pub title: String,
    /// Identifying key, unique across all posts.
    pub slug: String,
    /// Body (plain text or HTML).
    pub content: String,
    /// Category name.
    pub category: String,
    /// Cover image URL.
    pub image: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Check whether the given user wrote this post.
    pub fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == Some(user_id)
    }
}

/// Data for creating a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Authoring user.
    pub author_id: Option<i64>,
    /// Headline.
    pub title: String,
    /// Identifying key.
    pub slug: String,
    /// Body.
    pub content: String,
    /// Category (defaults to `uncategorized`).
    pub category: String,
    /// Cover image (defaults to the stock image).
    pub image: Option<String>,
}

impl NewPost {
    /// Create a new post whose slug is derived from the title.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let title = title.into().trim().to_string();
        Self {
            author_id: None,
            slug: slugify(&title),
            title,
            content: content.into(),
            category: DEFAULT_CATEGORY.to_string(),
            image: None,
        }
    }

    /// Override the slug.
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the cover image.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Partial update for a post. Unset fields are left as they are.
#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    /// New headline.
    pub title: Option<String>,
    /// New body.
    pub content: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New cover image.
    pub image: Option<String>,
}

impl PostUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the headline.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the body.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the cover image.
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Check if the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.image.is_none()
    }
}

/// Sort direction for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Oldest first.
    Asc,
    /// Newest first.
    #[default]
    Desc,
}

impl SortDirection {
    /// SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(format!("unknown sort direction: {s}")),
        }
    }
}

/// Filters and paging for post listings.
#[derive(Debug, Clone)]
pub struct PostFilter {
    /// Only posts by this author.
    pub user_id: Option<i64>,
    /// Only posts in this category.
    pub category: Option<String>,
    /// Only the post with this slug.
    pub slug: Option<String>,
    /// Only the post with this ID.
    pub post_id: Option<i64>,
    /// Substring of title or content.
    pub search_term: Option<String>,
    /// Rows to skip.
    pub start_index: i64,
    /// Maximum rows to return.
    pub limit: i64,
    /// Order on `updated_at`.
    pub sort: SortDirection,
}

impl Default for PostFilter {
    fn default() -> Self {
        Self {
            user_id: None,
            category: None,
            slug: None,
            post_id: None,
            search_term: None,
            start_index: 0,
            limit: DEFAULT_POST_LIMIT,
            sort: SortDirection::Desc,
        }
    }
}

/// Derive a URL slug from a title.
///
/// Spaces become hyphens, ASCII letters are lowercased and every character
/// outside `[a-z0-9-]` is dropped.
///
/// # Examples
///
/// ```
/// use gazette::post::slugify;
///
/// assert_eq!(slugify("Hello World!"), "hello-world");
/// assert_eq!(slugify("Rust 2024 Edition"), "rust-2024-edition");
/// ```
pub fn slugify(title: &str) -> String {
    title
        .split(' ')
        .collect::<Vec<_>>()
        .join("-")
        .to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}
