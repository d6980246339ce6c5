//! Post handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::comment::CommentRepository;
use crate::post::{
    NewPost, PostFilter, PostRepository, PostUpdate, SortDirection, DEFAULT_POST_LIMIT,
};
use crate::web::dto::{
    ApiResponse, CommentResponse, CreatePostRequest, PostListQuery, PostListResponse,
    PostResponse, UpdatePostRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

use super::{page_bounds, parse_sort, AppState};

/// GET /api/posts - Public listing with filters and dashboard totals.
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PostListQuery>,
) -> Result<Json<ApiResponse<PostListResponse>>, ApiError> {
    let (start_index, limit) = page_bounds(query.start_index, query.limit, DEFAULT_POST_LIMIT);
    let filter = PostFilter {
        user_id: query.user_id,
        category: query.category,
        slug: query.slug,
        post_id: query.post_id,
        search_term: query.search_term.filter(|s| !s.trim().is_empty()),
        start_index,
        limit,
        sort: parse_sort(query.sort.as_deref(), SortDirection::Desc)?,
    };

    let repo = PostRepository::new(state.db.pool());
    let posts = repo.list(&filter).await?;
    let response = PostListResponse {
        posts: posts.into_iter().map(PostResponse::from).collect(),
        total_posts: repo.count().await?,
        last_month_posts: repo.count_last_month().await?,
    };

    Ok(Json(ApiResponse::new(response)))
}

/// POST /api/posts - Publish a post (admin only).
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostResponse>>), ApiError> {
    auth.require_admin()?;

    let mut new_post = NewPost::new(req.title, req.content).with_author(auth.user_id());
    if new_post.slug.is_empty() {
        return Err(ApiError::unprocessable(
            "Title must contain at least one letter or digit",
        ));
    }
    if let Some(category) = req.category {
        new_post = new_post.with_category(category.trim());
    }
    if let Some(image) = req.image {
        new_post = new_post.with_image(image);
    }

    let repo = PostRepository::new(state.db.pool());
    let post = repo.create(&new_post).await?;

    tracing::info!(post_id = post.id, slug = %post.slug, "Post published");

    Ok((StatusCode::CREATED, Json(ApiResponse::new(post.into()))))
}

/// PUT /api/posts/:id - Edit a post (author or admin).
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(post_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdatePostRequest>,
) -> Result<Json<ApiResponse<PostResponse>>, ApiError> {
    let repo = PostRepository::new(state.db.pool());
    let post = repo
        .get_by_id(post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;
    auth.require_owner_or_admin(post.author_id)?;

    let mut update = PostUpdate::new();
    if let Some(title) = req.title {
        if title.trim().is_empty() {
            return Err(ApiError::unprocessable("Title must not be blank"));
        }
        update = update.title(title.trim());
    }
    if let Some(content) = req.content {
        if content.trim().is_empty() {
            return Err(ApiError::unprocessable("Content must not be blank"));
        }
        update = update.content(content);
    }
    if let Some(category) = req.category {
        update = update.category(category.trim());
    }
    if let Some(image) = req.image {
        update = update.image(image);
    }

    let post = repo
        .update(post_id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(Json(ApiResponse::new(post.into())))
}

/// DELETE /api/posts/:id - Remove a post and its comments (author or admin).
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let repo = PostRepository::new(state.db.pool());
    let post = repo
        .get_by_id(post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;
    auth.require_owner_or_admin(post.author_id)?;

    repo.delete(post_id).await?;
    tracing::info!(post_id, user_id = auth.user_id(), "Post deleted");

    Ok(Json(ApiResponse::new(())))
}

/// GET /api/posts/:id/comments - Comments on a post, newest first.
///
/// An unknown post simply has no comments.
pub async fn list_post_comments(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<CommentResponse>>>, ApiError> {
    let comments = CommentRepository::new(state.db.pool())
        .list_for_post(post_id)
        .await?;

    Ok(Json(ApiResponse::new(
        comments.into_iter().map(CommentResponse::from).collect(),
    )))
}
