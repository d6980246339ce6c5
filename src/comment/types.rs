//! Comment model for Gazette.

use chrono::{DateTime, Utc};

use crate::post::SortDirection;

/// Default page size for the moderation listing.
pub const DEFAULT_COMMENT_LIMIT: i64 = 10;

/// A comment on a post, joined with its author.
#[derive(Debug, Clone)]
pub struct Comment {
    /// Unique comment ID.
    pub id: i64,
    /// Post the comment belongs to.
    pub post_id: i64,
    /// Author.
    pub user_id: i64,
    /// Author's username.
    pub username: String,
    /// Author's avatar URL.
    pub profile_picture: String,
    /// Comment text.
    pub content: String,
    /// Number of likes; always equals `likes.len()`.
    pub number_of_likes: i64,
    /// IDs of the users who liked the comment.
    pub likes: Vec<i64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Check whether the given user liked this comment.
    pub fn is_liked_by(&self, user_id: i64) -> bool {
        self.likes.contains(&user_id)
    }
}

/// Data for creating a new comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    /// Target post.
    pub post_id: i64,
    /// Author.
    pub user_id: i64,
    /// Comment text.
    pub content: String,
}

impl NewComment {
    /// Create a new comment.
    pub fn new(post_id: i64, user_id: i64, content: impl Into<String>) -> Self {
        Self {
            post_id,
            user_id,
            content: content.into(),
        }
    }
}

/// Paging for the moderation listing.
#[derive(Debug, Clone)]
pub struct CommentFilter {
    /// Rows to skip.
    pub start_index: i64,
    /// Maximum rows to return.
    pub limit: i64,
    /// Order on `created_at`.
    pub sort: SortDirection,
}

impl Default for CommentFilter {
    fn default() -> Self {
        Self {
            start_index: 0,
            limit: DEFAULT_COMMENT_LIMIT,
            sort: SortDirection::Asc,
        }
    }
}

/// Parse the comma-separated ID list produced by `GROUP_CONCAT`.
pub(crate) fn parse_id_list(list: Option<&str>) -> Vec<i64> {
    list.map(|s| s.split(',').filter_map(|id| id.trim().parse().ok()).collect())
        .unwrap_or_default()
}
