//! Response DTOs.

use serde::Serialize;

use crate::comment::Comment;
use crate::db::User;
use crate::post::Post;

/// Envelope for successful responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Payload.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a payload.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Public view of a user. The password hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub is_admin: bool,
    pub profile_picture: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            is_admin: user.is_admin(),
            role: user.role.as_str().to_string(),
            username: user.username,
            email: user.email,
            profile_picture: user.profile_picture,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

/// Login result. The token is also set as an HTTP-only cookie.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Access token (JWT).
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub author_id: Option<i64>,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub category: String,
    pub image: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id,
            title: post.title,
            slug: post.slug,
            content: post.content,
            category: post.category,
            image: post.image,
            created_at: post.created_at.to_rfc3339(),
            updated_at: post.updated_at.to_rfc3339(),
        }
    }
}

/// A page of posts plus dashboard totals.
#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub total_posts: i64,
    pub last_month_posts: i64,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub username: String,
    pub profile_picture: String,
    pub content: String,
    pub number_of_likes: i64,
    /// IDs of users who liked the comment.
    pub likes: Vec<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            username: comment.username,
            profile_picture: comment.profile_picture,
            content: comment.content,
            number_of_likes: comment.number_of_likes,
            likes: comment.likes,
            created_at: comment.created_at.to_rfc3339(),
            updated_at: comment.updated_at.to_rfc3339(),
        }
    }
}

/// A page of comments plus moderation totals.
#[derive(Debug, Serialize)]
pub struct CommentListResponse {
    pub comments: Vec<CommentResponse>,
    pub total_comments: i64,
    pub last_month_comments: i64,
}
