//! Authentication module for Gazette.
//!
//! Password hashing, user registration, credential checks and the
//! bootstrap administrator.

mod password;
mod registration;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use registration::{
    authenticate, ensure_admin, register, register_with_role, RegistrationError,
    RegistrationRequest,
};
