//! Error types for Gazette.

use thiserror::Error;

/// Common error type for Gazette.
#[derive(Error, Debug)]
pub enum GazetteError {
    /// Database error.
    ///
    /// Errors from sqlx are converted automatically; unique-constraint
    /// violations become [`GazetteError::Conflict`] instead.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Permission denied error.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Feed fetch or parse error.
    #[error("feed error: {0}")]
    Feed(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for GazetteError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return GazetteError::Conflict(db_err.message().to_string());
            }
        }
        GazetteError::Database(e.to_string())
    }
}

/// Result type alias for Gazette operations.
pub type Result<T> = std::result::Result<T, GazetteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = GazetteError::Auth("invalid password".to_string());
        assert_eq!(err.to_string(), "authentication error: invalid password");
    }

    #[test]
    fn test_permission_error_display() {
        let err = GazetteError::Permission("admin access required".to_string());
        assert_eq!(err.to_string(), "permission denied: admin access required");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = GazetteError::NotFound("post".to_string());
        assert_eq!(err.to_string(), "post not found");
    }

    #[test]
    fn test_conflict_error_display() {
        let err = GazetteError::Conflict("UNIQUE constraint failed: posts.slug".to_string());
        assert!(err.to_string().starts_with("conflict:"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GazetteError = io_err.into();
        assert!(matches!(err, GazetteError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_feed_error_display() {
        let err = GazetteError::Feed("failed to parse feed".to_string());
        assert_eq!(err.to_string(), "feed error: failed to parse feed");
    }

    #[test]
    fn test_row_not_found_is_database_error() {
        let err: GazetteError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, GazetteError::Database(_)));
    }
}
