//! Authentication handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::auth::{authenticate, register as register_user, RegistrationRequest};
use crate::db::UserRepository;
use crate::web::dto::{
    ApiResponse, LoginRequest, LoginResponse, RegisterRequest, UserResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, ACCESS_TOKEN_COOKIE};

use super::AppState;

/// POST /api/auth/register - Create a member account.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    let repo = UserRepository::new(state.db.pool());
    let user = register_user(
        &repo,
        RegistrationRequest::new(req.username, req.email, req.password),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(user.into()))))
}

/// POST /api/auth/login - Sign in and receive the session cookie.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginResponse>>), ApiError> {
    let repo = UserRepository::new(state.db.pool());
    let user = authenticate(&repo, &req.email, &req.password)
        .await
        .map_err(|_| ApiError::unauthorized("Invalid email or password"))?;

    let token = state.issue_token(&user)?;
    let cookie = Cookie::build((ACCESS_TOKEN_COOKIE, token.clone()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.cookie_secure)
        .path("/");

    tracing::info!(user_id = user.id, username = %user.username, "User logged in");

    let response = LoginResponse {
        token,
        expires_in: state.token_expiry_secs,
        user: user.into(),
    };
    Ok((jar.add(cookie), Json(ApiResponse::new(response))))
}

/// POST /api/auth/logout - Clear the session cookie.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<ApiResponse<()>>) {
    let jar = jar.remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/"));
    (jar, Json(ApiResponse::new(())))
}

/// GET /api/auth/me - The signed-in user.
pub async fn me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let repo = UserRepository::new(state.db.pool());
    let user = repo
        .get_by_id(auth.user_id())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ApiResponse::new(user.into())))
}
