//! JWT authentication.
//!
//! Tokens are read from the `access_token` cookie set at login, or from an
//! `Authorization: Bearer` header for non-browser clients.

use std::sync::Arc;

use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::db::Role;
use crate::web::error::ApiError;

/// Name of the session cookie.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// User ID.
    pub sub: i64,
    /// Username.
    pub username: String,
    /// Role name (`member` or `admin`).
    pub role: String,
    /// Issued at (Unix seconds).
    pub iat: u64,
    /// Expiry (Unix seconds).
    pub exp: u64,
    /// Token ID.
    pub jti: String,
}

/// Verification half of the JWT setup.
#[derive(Clone)]
pub struct JwtState {
    /// Decoding key.
    pub decoding_key: DecodingKey,
    /// Validation settings.
    pub validation: Validation,
}

impl JwtState {
    /// Create a JWT state from a secret key.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Decode and validate a token.
    pub fn verify(&self, token: &str) -> Result<JwtClaims, ApiError> {
        decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("JWT validation failed: {}", e);
                ApiError::unauthorized("Invalid or expired token")
            })
    }
}

/// Pull the raw token from the request, header first.
fn extract_token(parts: &Parts) -> Option<String> {
    let from_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string());

    from_header.or_else(|| {
        CookieJar::from_headers(&parts.headers)
            .get(ACCESS_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
    })
}

/// Extractor for authenticated users.
#[derive(Debug, Clone)]
pub struct AuthUser(pub JwtClaims);

impl AuthUser {
    /// The caller's user ID.
    pub fn user_id(&self) -> i64 {
        self.0.sub
    }

    /// The caller's role; unknown role names fall back to member.
    pub fn role(&self) -> Role {
        self.0.role.parse().unwrap_or_default()
    }

    /// Check if the caller is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }

    /// Fail with 403 unless the caller is an administrator.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::forbidden("Administrator access required"))
        }
    }

    /// Fail with 403 unless the caller owns the resource or is an administrator.
    pub fn require_owner_or_admin(&self, owner_id: Option<i64>) -> Result<(), ApiError> {
        if self.is_admin() || owner_id == Some(self.user_id()) {
            Ok(())
        } else {
            Err(ApiError::forbidden(
                "You are not allowed to modify this resource",
            ))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts).ok_or_else(|| ApiError::unauthorized("Missing authorization"))?;

        let jwt_state = parts
            .extensions
            .get::<Arc<JwtState>>()
            .ok_or_else(|| ApiError::internal("JWT state not configured"))?;

        jwt_state.verify(&token).map(AuthUser)
    }
}

/// Middleware injecting the JWT state into request extensions.
pub async fn jwt_auth(
    jwt_state: Arc<JwtState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(jwt_state);
    next.run(request).await
}
