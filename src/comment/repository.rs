//! Comment repository for Gazette.

use chrono::Utc;

use super::types::{parse_id_list, Comment, CommentFilter, NewComment};
use crate::db::{parse_datetime, DbPool};
use crate::{GazetteError, Result};

const COMMENT_SELECT: &str = "SELECT c.id, c.post_id, c.user_id, u.username, u.profile_picture,
        c.content, c.number_of_likes, c.created_at, c.updated_at,
        (SELECT GROUP_CONCAT(cl.user_id) FROM comment_likes cl WHERE cl.comment_id = c.id) AS liked_by
     FROM comments c
     JOIN users u ON u.id = c.user_id";

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: i64,
    post_id: i64,
    user_id: i64,
    username: String,
    profile_picture: String,
    content: String,
    number_of_likes: i64,
    created_at: String,
    updated_at: String,
    liked_by: Option<String>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            post_id: row.post_id,
            user_id: row.user_id,
            username: row.username,
            profile_picture: row.profile_picture,
            content: row.content,
            number_of_likes: row.number_of_likes,
            likes: parse_id_list(row.liked_by.as_deref()),
            created_at: parse_datetime(&row.created_at).unwrap_or_else(Utc::now),
            updated_at: parse_datetime(&row.updated_at).unwrap_or_else(Utc::now),
        }
    }
}

/// Repository for comment operations.
pub struct CommentRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> CommentRepository<'a> {
    /// Create a new CommentRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new comment.
    pub async fn create(&self, new_comment: &NewComment) -> Result<Comment> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO comments (post_id, user_id, content) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(new_comment.post_id)
        .bind(new_comment.user_id)
        .bind(&new_comment.content)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| GazetteError::NotFound("comment".to_string()))
    }

    /// Get a comment by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        let row: Option<CommentRow> = sqlx::query_as(&format!("{COMMENT_SELECT} WHERE c.id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(Comment::from))
    }

    /// List the comments of a post, newest first.
    pub async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        let rows: Vec<CommentRow> = sqlx::query_as(&format!(
            "{COMMENT_SELECT} WHERE c.post_id = ? ORDER BY c.created_at DESC, c.id DESC"
        ))
        .bind(post_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    /// List all comments with paging, ordered on `created_at`.
    pub async fn list(&self, filter: &CommentFilter) -> Result<Vec<Comment>> {
        let direction = filter.sort.as_sql();
        let rows: Vec<CommentRow> = sqlx::query_as(&format!(
            "{COMMENT_SELECT} ORDER BY c.created_at {direction}, c.id {direction} LIMIT ? OFFSET ?"
        ))
        .bind(filter.limit.max(0))
        .bind(filter.start_index.max(0))
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    /// Replace the text of a comment. Returns None if not found.
    pub async fn update_content(&self, id: i64, content: &str) -> Result<Option<Comment>> {
        let result = sqlx::query(
            "UPDATE comments SET content = ?, updated_at = datetime('now') WHERE id = ?",
        )
        .bind(content)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    /// Delete a comment by ID.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add the user's like, or remove it if already present.
    ///
    /// The like row and `number_of_likes` change in one transaction.
    /// Returns None if the comment does not exist.
    pub async fn toggle_like(&self, comment_id: i64, user_id: i64) -> Result<Option<Comment>> {
        let mut tx = self.pool.begin().await?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM comments WHERE id = ?)")
            .bind(comment_id)
            .fetch_one(&mut *tx)
            .await?;
        if !exists {
            return Ok(None);
        }

        let removed = sqlx::query("DELETE FROM comment_likes WHERE comment_id = ? AND user_id = ?")
            .bind(comment_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        if removed {
            sqlx::query("UPDATE comments SET number_of_likes = number_of_likes - 1 WHERE id = ?")
                .bind(comment_id)
                .execute(&mut *tx)
                .await?;
        } else {
            sqlx::query("INSERT INTO comment_likes (comment_id, user_id) VALUES (?, ?)")
                .bind(comment_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("UPDATE comments SET number_of_likes = number_of_likes + 1 WHERE id = ?")
                .bind(comment_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        self.get_by_id(comment_id).await
    }

    /// Count all comments.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Count comments created during the last month.
    pub async fn count_last_month(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments WHERE created_at >= datetime('now', '-1 month')",
        )
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }
}
