//! Post repository for Gazette.
//!
//! This module provides CRUD operations for posts in the database.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::QueryBuilder;

use super::types::{NewPost, Post, PostFilter, PostUpdate, DEFAULT_POST_IMAGE};
use crate::db::{parse_datetime, DbPool};
use crate::{GazetteError, Result};

const POST_COLUMNS: &str =
    "id, author_id, title, slug, content, category, image, created_at, updated_at";

/// Store operations the ingestion job needs.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Look up a post by its identifying key.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>>;

    /// Insert a new post.
    async fn insert(&self, post: &NewPost) -> Result<Post>;
}

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i64,
    author_id: Option<i64>,
    title: String,
    slug: String,
    content: String,
    category: String,
    image: String,
    created_at: String,
    updated_at: String,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            author_id: row.author_id,
            title: row.title,
            slug: row.slug,
            content: row.content,
            category: row.category,
            image: row.image,
            created_at: parse_datetime(&row.created_at).unwrap_or_else(Utc::now),
            updated_at: parse_datetime(&row.updated_at).unwrap_or_else(Utc::now),
        }
    }
}

/// Escape LIKE wildcards so a search term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Repository for post CRUD operations.
pub struct PostRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new post.
    ///
    /// A duplicate slug or title is reported as [`GazetteError::Conflict`].
    pub async fn create(&self, new_post: &NewPost) -> Result<Post> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO posts (author_id, title, slug, content, category, image)
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(new_post.author_id)
        .bind(&new_post.title)
        .bind(&new_post.slug)
        .bind(&new_post.content)
        .bind(&new_post.category)
        .bind(new_post.image.as_deref().unwrap_or(DEFAULT_POST_IMAGE))
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| GazetteError::NotFound("post".to_string()))
    }

    /// Get a post by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let row: Option<PostRow> =
            sqlx::query_as(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        Ok(row.map(Post::from))
    }

    /// Get a post by slug (exact match).
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let row: Option<PostRow> =
            sqlx::query_as(&format!("SELECT {POST_COLUMNS} FROM posts WHERE slug = ?"))
                .bind(slug)
                .fetch_optional(self.pool)
                .await?;
        Ok(row.map(Post::from))
    }

    /// Update a post by ID.
    ///
    /// Only fields that are set in the update are modified; `updated_at` is
    /// always refreshed. Returns the updated post, or None if not found.
    pub async fn update(&self, id: i64, update: &PostUpdate) -> Result<Option<Post>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE posts SET ");
        let mut separated = query.separated(", ");

        if let Some(ref title) = update.title {
            separated.push("title = ");
            separated.push_bind_unseparated(title.trim().to_string());
        }
        if let Some(ref content) = update.content {
            separated.push("content = ");
            separated.push_bind_unseparated(content.clone());
        }
        if let Some(ref category) = update.category {
            separated.push("category = ");
            separated.push_bind_unseparated(category.clone());
        }
        if let Some(ref image) = update.image {
            separated.push("image = ");
            separated.push_bind_unseparated(image.clone());
        }
        separated.push("updated_at = datetime('now')");

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Delete a post by ID. Comments go with it.
    ///
    /// Returns true if a post was deleted, false if not found.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List posts matching the filter, ordered on `updated_at`.
    pub async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>> {
        let mut query: QueryBuilder<sqlx::Sqlite> =
            QueryBuilder::new(format!("SELECT {POST_COLUMNS} FROM posts WHERE 1 = 1"));

        if let Some(user_id) = filter.user_id {
            query.push(" AND author_id = ").push_bind(user_id);
        }
        if let Some(ref category) = filter.category {
            query.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(ref slug) = filter.slug {
            query.push(" AND slug = ").push_bind(slug.clone());
        }
        if let Some(post_id) = filter.post_id {
            query.push(" AND id = ").push_bind(post_id);
        }
        if let Some(ref term) = filter.search_term {
            let pattern = escape_like(term);
            query
                .push(" AND (title LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR content LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }

        let direction = filter.sort.as_sql();
        query.push(format!(
            " ORDER BY updated_at {direction}, id {direction} LIMIT "
        ));
        query.push_bind(filter.limit.max(0));
        query.push(" OFFSET ");
        query.push_bind(filter.start_index.max(0));

        let rows: Vec<PostRow> = query.build_query_as().fetch_all(self.pool).await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    /// Count all posts.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Count posts created during the last month.
    pub async fn count_last_month(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM posts WHERE created_at >= datetime('now', '-1 month')",
        )
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }
}

#[async_trait]
impl PostStore for PostRepository<'_> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        self.get_by_slug(slug).await
    }

    async fn insert(&self, post: &NewPost) -> Result<Post> {
        self.create(post).await
    }
}
