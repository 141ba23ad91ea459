//! User directory error types.

use thiserror::Error;

use fintrack_shared::{AppError, JwtError};

use crate::auth::PasswordError;
use crate::repository::RepositoryError;

/// Errors that can occur during registration and login.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// Malformed registration input.
    #[error("{0}")]
    Validation(String),

    /// Another user already registered this email.
    #[error("Email already in use")]
    EmailAlreadyInUse,

    /// Another user already registered this username.
    #[error("Username already in use")]
    UsernameAlreadyInUse,

    /// Unknown email or wrong password. Deliberately does not say which.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Persisting the new user failed.
    #[error("Registration failed: {0}")]
    RegistrationFailed(String),

    /// Password hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Token issuance failed.
    #[error(transparent)]
    Token(#[from] JwtError),

    /// Storage failure while looking a user up.
    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Validation(msg) => Self::Validation(msg),
            DirectoryError::EmailAlreadyInUse | DirectoryError::UsernameAlreadyInUse => {
                Self::Conflict(err.to_string())
            }
            DirectoryError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            DirectoryError::RegistrationFailed(msg) => Self::Database(msg),
            DirectoryError::Password(_) | DirectoryError::Token(_) => {
                Self::Internal(err.to_string())
            }
            DirectoryError::Storage(e) => e.into(),
        }
    }
}
