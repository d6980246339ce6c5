//! User model for Gazette.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

/// Avatar assigned to new accounts.
pub const DEFAULT_PROFILE_PICTURE: &str =
    "https://cdn-icons-png.flaticon.com/512/149/149071.png";

/// User role for permission management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Role {
    /// Regular member: may comment.
    #[default]
    Member = 0,
    /// Administrator: may publish posts and moderate comments.
    Admin = 1,
}

impl Role {
    /// Convert role to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }

    /// Check if this role has at least the required permission level.
    ///
    /// # Examples
    ///
    /// ```
    /// use gazette::db::Role;
    ///
    /// assert!(Role::Admin.can_access(Role::Member));
    /// assert!(!Role::Member.can_access(Role::Admin));
    /// ```
    pub fn can_access(&self, required: Role) -> bool {
        *self >= required
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(Role::Member),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// A registered user.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Display username (unique, case-insensitive).
    pub username: String,
    /// Login email (unique, case-insensitive).
    pub email: String,
    /// Password hash (Argon2).
    pub password: String,
    /// Permission role.
    pub role: Role,
    /// Avatar URL.
    pub profile_picture: String,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if this user is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display username.
    pub username: String,
    /// Login email.
    pub email: String,
    /// Password hash (should be pre-hashed with Argon2).
    pub password: String,
    /// Role (defaults to Member).
    pub role: Role,
}

impl NewUser {
    /// Create a new member account.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            role: Role::Member,
        }
    }

    /// Set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_strings() {
        assert_eq!(Role::Member.as_str(), "member");
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_ordering() {
        assert!(Role::Admin > Role::Member);
        assert!(Role::Admin.can_access(Role::Admin));
        assert!(Role::Member.can_access(Role::Member));
        assert_eq!(Role::default(), Role::Member);
    }

    #[test]
    fn test_new_user_defaults() {
        let user = NewUser::new("alice", "alice@example.com", "hash");
        assert_eq!(user.role, Role::Member);

        let admin = NewUser::new("root", "root@example.com", "hash").with_role(Role::Admin);
        assert_eq!(admin.role, Role::Admin);
    }
}
