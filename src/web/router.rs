//! Router configuration for the HTTP API.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_comment, create_post, delete_comment, delete_post, like_comment, list_comments,
    list_post_comments, list_posts, login, logout, me, register, update_comment, update_post,
    AppState,
};
use super::middleware::{create_cors_layer, jwt_auth, JwtState};

/// Create the `/api` router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me));

    let post_routes = Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:id", put(update_post).delete(delete_post))
        .route("/:id/comments", get(list_post_comments));

    let comment_routes = Router::new()
        .route("/", get(list_comments).post(create_comment))
        .route("/:id", put(update_comment).delete(delete_comment))
        .route("/:id/like", put(like_comment));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/posts", post_routes)
        .nest("/comments", comment_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    jwt_auth(jwt_state.clone(), req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_check() {
        let response = create_health_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
