//! API handlers.

pub mod auth;
pub mod comment;
pub mod post;

pub use auth::*;
pub use comment::*;
pub use post::*;

use jsonwebtoken::{encode, EncodingKey, Header};

use crate::config::ServerConfig;
use crate::db::User;
use crate::web::error::ApiError;
use crate::web::middleware::JwtClaims;
use crate::Database;

/// Largest page size a listing endpoint will serve.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Connection pool.
    pub db: Database,
    /// JWT encoding key.
    pub encoding_key: EncodingKey,
    /// Access token lifetime in seconds.
    pub token_expiry_secs: u64,
    /// Mark the session cookie `Secure`.
    pub cookie_secure: bool,
}

impl AppState {
    /// Create the state from the server section of the config.
    pub fn new(db: Database, config: &ServerConfig) -> Self {
        Self {
            db,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_expiry_secs: config.jwt_expiry_secs,
            cookie_secure: config.cookie_secure,
        }
    }

    /// Sign an access token for a user.
    pub fn issue_token(&self, user: &User) -> Result<String, ApiError> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let claims = JwtClaims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role.as_str().to_string(),
            iat: now,
            exp: now + self.token_expiry_secs,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            ApiError::internal("Failed to generate token")
        })
    }
}

/// Normalize client paging input.
///
/// Negative offsets become zero; the limit falls back to `default` and is
/// capped at [`MAX_PAGE_LIMIT`].
pub(crate) fn page_bounds(start_index: Option<i64>, limit: Option<i64>, default: i64) -> (i64, i64) {
    let start = start_index.unwrap_or(0).max(0);
    let limit = match limit {
        Some(n) if n > 0 => n.min(MAX_PAGE_LIMIT),
        _ => default,
    };
    (start, limit)
}

/// Parse a `sort` query value, falling back to `default` when absent.
pub(crate) fn parse_sort(
    value: Option<&str>,
    default: crate::post::SortDirection,
) -> Result<crate::post::SortDirection, ApiError> {
    match value {
        None => Ok(default),
        Some(s) => s.parse().map_err(ApiError::bad_request),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::SortDirection;
    use crate::web::middleware::JwtState;

    #[test]
    fn test_page_bounds() {
        assert_eq!(page_bounds(None, None, 9), (0, 9));
        assert_eq!(page_bounds(Some(-5), Some(0), 9), (0, 9));
        assert_eq!(page_bounds(Some(18), Some(500), 9), (18, MAX_PAGE_LIMIT));
        assert_eq!(page_bounds(Some(3), Some(4), 10), (3, 4));
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(parse_sort(None, SortDirection::Asc).unwrap(), SortDirection::Asc);
        assert_eq!(
            parse_sort(Some("DESC"), SortDirection::Asc).unwrap(),
            SortDirection::Desc
        );
        assert!(parse_sort(Some("sideways"), SortDirection::Asc).is_err());
    }

    #[tokio::test]
    async fn test_issued_token_verifies() {
        let db = Database::open_in_memory().await.unwrap();
        let config = ServerConfig {
            jwt_secret: "state-secret".to_string(),
            ..Default::default()
        };
        let state = AppState::new(db, &config);

        let user = User {
            id: 42,
            username: "reader".to_string(),
            email: "reader@example.com".to_string(),
            password: String::new(),
            role: crate::db::Role::Member,
            profile_picture: String::new(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let token = state.issue_token(&user).unwrap();
        let claims = JwtState::new("state-secret").verify(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "member");
        assert_eq!(claims.exp - claims.iat, config.jwt_expiry_secs);
    }
}
