//! Password hashing with Argon2id.
//!
//! Uses the recommended Argon2id variant with secure defaults. Verification
//! goes through `argon2`'s own comparison, which runs in constant time with
//! respect to the digest contents.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashingFailed(String),

    /// Stored digest is not a valid PHC string.
    #[error("stored password digest is corrupt")]
    CorruptDigest,
}

/// Hashes a password using Argon2id with a fresh random salt.
///
/// # Errors
///
/// Returns `PasswordError::HashingFailed` if hashing fails.
///
/// # Example
///
/// ```
/// use fintrack_core::auth::hash_password;
///
/// let hash = hash_password("my_secure_password").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))
}

/// Verifies a password against a stored digest.
///
/// A mismatch is `Ok(false)`, not an error.
///
/// # Errors
///
/// Returns `PasswordError::CorruptDigest` if the digest cannot be parsed or
/// names parameters the verifier rejects.
///
/// # Example
///
/// ```
/// use fintrack_core::auth::{hash_password, verify_password};
///
/// let hash = hash_password("my_password").unwrap();
/// assert!(verify_password("my_password", &hash).unwrap());
/// assert!(!verify_password("wrong_password", &hash).unwrap());
/// ```
pub fn verify_password(password: &str, digest: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(digest).map_err(|_| PasswordError::CorruptDigest)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(_) => Err(PasswordError::CorruptDigest),
    }
}
