//! User registration, login and administrator bootstrap.

use thiserror::Error;
use tracing::info;

use crate::auth::{hash_password, verify_password, PasswordError};
use crate::config::AdminConfig;
use crate::db::{NewUser, Role, User, UserRepository};
use crate::GazetteError;

/// Registration-specific errors.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// A field failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Username already exists.
    #[error("username already exists")]
    UsernameExists,

    /// Email already exists.
    #[error("email already exists")]
    EmailExists,

    /// Password rejected or hashing failed.
    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    /// Storage error.
    #[error(transparent)]
    Database(#[from] GazetteError),
}

/// Registration request data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Desired username.
    pub username: String,
    /// Login email.
    pub email: String,
    /// Plain-text password (8-128 characters).
    pub password: String,
}

impl RegistrationRequest {
    /// Create a new registration request.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Register a new member.
pub async fn register(
    repo: &UserRepository<'_>,
    request: RegistrationRequest,
) -> std::result::Result<User, RegistrationError> {
    register_with_role(repo, request, Role::Member).await
}

/// Register a new user with a specific role.
///
/// Usernames and emails are checked before hashing; a concurrent insert that
/// slips past the check still surfaces as a conflict from the store.
pub async fn register_with_role(
    repo: &UserRepository<'_>,
    request: RegistrationRequest,
    role: Role,
) -> std::result::Result<User, RegistrationError> {
    let username = request.username.trim();
    let email = request.email.trim();

    if username.is_empty() {
        return Err(RegistrationError::Validation(
            "username is required".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(RegistrationError::Validation(
            "email address is invalid".to_string(),
        ));
    }

    if repo.username_exists(username).await? {
        return Err(RegistrationError::UsernameExists);
    }
    if repo.email_exists(email).await? {
        return Err(RegistrationError::EmailExists);
    }

    let password_hash = hash_password(&request.password)?;
    let user = repo
        .create(&NewUser::new(username, email, password_hash).with_role(role))
        .await?;

    info!(
        username = %user.username,
        user_id = user.id,
        role = %role,
        "New user registered"
    );

    Ok(user)
}

/// Check an email/password pair and return the matching user.
///
/// Unknown emails and wrong passwords produce the same error.
pub async fn authenticate(
    repo: &UserRepository<'_>,
    email: &str,
    password: &str,
) -> crate::Result<User> {
    let invalid = || GazetteError::Auth("invalid email or password".to_string());

    let user = repo.get_by_email(email.trim()).await?.ok_or_else(invalid)?;
    verify_password(password, &user.password).map_err(|_| invalid())?;
    Ok(user)
}

/// Create the configured administrator if no account with that email exists.
///
/// Returns the newly created user, or `None` when the account was already there.
pub async fn ensure_admin(
    repo: &UserRepository<'_>,
    admin: &AdminConfig,
) -> std::result::Result<Option<User>, RegistrationError> {
    if let Some(existing) = repo.get_by_email(&admin.email).await? {
        if !existing.is_admin() {
            repo.set_role(existing.id, Role::Admin).await?;
            info!(user_id = existing.id, "Promoted configured account to admin");
        }
        return Ok(None);
    }

    let request = RegistrationRequest::new(&admin.username, &admin.email, &admin.password);
    register_with_role(repo, request, Role::Admin).await.map(Some)
}
