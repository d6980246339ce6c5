//! Request DTOs.

use serde::Deserialize;
use validator::Validate;

use super::validation::{no_control_chars, not_empty_trimmed};

/// Registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username.
    #[validate(
        length(min = 1, max = 50, message = "Username must be 1-50 characters"),
        custom(function = "not_empty_trimmed"),
        custom(function = "no_control_chars")
    )]
    pub username: String,
    /// Email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Post creation request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    /// Headline.
    #[validate(
        length(min = 1, max = 300, message = "Title must be 1-300 characters"),
        custom(function = "not_empty_trimmed"),
        custom(function = "no_control_chars")
    )]
    pub title: String,
    /// Body.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub content: String,
    /// Category.
    #[validate(length(min = 1, max = 50, message = "Category must be 1-50 characters"))]
    pub category: Option<String>,
    /// Cover image URL.
    #[validate(url(message = "Image must be a URL"))]
    pub image: Option<String>,
}

/// Post update request. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    /// Headline.
    #[validate(length(min = 1, max = 300, message = "Title must be 1-300 characters"))]
    pub title: Option<String>,
    /// Body.
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: Option<String>,
    /// Category.
    #[validate(length(min = 1, max = 50, message = "Category must be 1-50 characters"))]
    pub category: Option<String>,
    /// Cover image URL.
    #[validate(url(message = "Image must be a URL"))]
    pub image: Option<String>,
}

/// Query parameters for listing posts.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListQuery {
    /// Author filter.
    #[serde(alias = "user_id")]
    pub user_id: Option<i64>,
    /// Category filter.
    pub category: Option<String>,
    /// Slug filter.
    pub slug: Option<String>,
    /// Post ID filter.
    #[serde(alias = "post_id")]
    pub post_id: Option<i64>,
    /// Substring of title or content.
    #[serde(alias = "search_term")]
    pub search_term: Option<String>,
    /// Rows to skip.
    #[serde(alias = "start_index")]
    pub start_index: Option<i64>,
    /// Page size.
    pub limit: Option<i64>,
    /// `asc` or `desc`.
    #[serde(alias = "order")]
    pub sort: Option<String>,
}

/// Query parameters for the moderation comment listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentListQuery {
    /// Rows to skip.
    #[serde(alias = "start_index")]
    pub start_index: Option<i64>,
    /// Page size.
    pub limit: Option<i64>,
    /// `asc` or `desc`.
    #[serde(alias = "order")]
    pub sort: Option<String>,
}

/// Comment creation request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    /// Target post.
    #[serde(alias = "postId")]
    pub post_id: i64,
    /// Comment text.
    #[validate(
        length(min = 1, max = 200, message = "Comment must be 1-200 characters"),
        custom(function = "not_empty_trimmed"),
        custom(function = "no_control_chars")
    )]
    pub content: String,
}

/// Comment edit request.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    /// New text.
    #[validate(
        length(min = 1, max = 200, message = "Comment must be 1-200 characters"),
        custom(function = "not_empty_trimmed"),
        custom(function = "no_control_chars")
    )]
    pub content: String,
}
