//! User directory types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use fintrack_shared::types::UserId;

/// A registered user.
///
/// Holds the password digest, never the plaintext. Deliberately not
/// `Serialize`: responses are built from [`User::profile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Unique username.
    pub username: String,
    /// Unique email, normalized to lowercase.
    pub email: String,
    /// Argon2id PHC digest.
    pub password_hash: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Returns the public view of this user.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

/// Public user info, safe to return to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    /// User ID.
    pub id: UserId,
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for registering a user.
#[derive(Clone)]
pub struct RegisterInput {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext password. Dropped once hashed.
    pub password: String,
}

/// Email and password presented at login.
#[derive(Clone)]
pub struct Credentials {
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

impl std::fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterInput")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[hidden]")
            .finish()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[hidden]")
            .finish()
    }
}

/// Session token handed out after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthToken {
    /// Signed session token.
    pub token: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
}

/// Normalizes an email for storage and lookup.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
