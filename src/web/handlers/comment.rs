//! Comment handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::comment::{CommentFilter, CommentRepository, NewComment, DEFAULT_COMMENT_LIMIT};
use crate::post::{PostRepository, SortDirection};
use crate::web::dto::{
    ApiResponse, CommentListQuery, CommentListResponse, CommentResponse, CreateCommentRequest,
    UpdateCommentRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

use super::{page_bounds, parse_sort, AppState};

/// GET /api/comments - Moderation listing (admin only).
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<CommentListQuery>,
) -> Result<Json<ApiResponse<CommentListResponse>>, ApiError> {
    auth.require_admin()?;

    let (start_index, limit) = page_bounds(query.start_index, query.limit, DEFAULT_COMMENT_LIMIT);
    let filter = CommentFilter {
        start_index,
        limit,
        sort: parse_sort(query.sort.as_deref(), SortDirection::Asc)?,
    };

    let repo = CommentRepository::new(state.db.pool());
    let comments = repo.list(&filter).await?;
    let response = CommentListResponse {
        comments: comments.into_iter().map(CommentResponse::from).collect(),
        total_comments: repo.count().await?,
        last_month_comments: repo.count_last_month().await?,
    };

    Ok(Json(ApiResponse::new(response)))
}

/// POST /api/comments - Comment on a post as the caller.
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CommentResponse>>), ApiError> {
    let posts = PostRepository::new(state.db.pool());
    if posts.get_by_id(req.post_id).await?.is_none() {
        return Err(ApiError::not_found("Post not found"));
    }

    let repo = CommentRepository::new(state.db.pool());
    let comment = repo
        .create(&NewComment::new(req.post_id, auth.user_id(), req.content.trim()))
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(comment.into()))))
}

/// PUT /api/comments/:id - Edit a comment (owner or admin).
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(comment_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateCommentRequest>,
) -> Result<Json<ApiResponse<CommentResponse>>, ApiError> {
    let repo = CommentRepository::new(state.db.pool());
    let comment = repo
        .get_by_id(comment_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;
    auth.require_owner_or_admin(Some(comment.user_id))?;

    let comment = repo
        .update_content(comment_id, req.content.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    Ok(Json(ApiResponse::new(comment.into())))
}

/// DELETE /api/comments/:id - Remove a comment (owner or admin).
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(comment_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let repo = CommentRepository::new(state.db.pool());
    let comment = repo
        .get_by_id(comment_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;
    auth.require_owner_or_admin(Some(comment.user_id))?;

    repo.delete(comment_id).await?;
    Ok(Json(ApiResponse::new(())))
}

/// PUT /api/comments/:id/like - Like or unlike a comment.
pub async fn like_comment(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(comment_id): Path<i64>,
) -> Result<Json<ApiResponse<CommentResponse>>, ApiError> {
    let comment = CommentRepository::new(state.db.pool())
        .toggle_like(comment_id, auth.user_id())
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    Ok(Json(ApiResponse::new(comment.into())))
}
