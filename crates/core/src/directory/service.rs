//! User directory service: registration and login.

use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use tracing::{error, info};

use fintrack_shared::JwtService;
use fintrack_shared::types::UserId;

use super::error::DirectoryError;
use super::types::{AuthToken, Credentials, RegisterInput, User, normalize_email};
use crate::auth::{PasswordError, hash_password, verify_password};
use crate::repository::{RepositoryError, UserStore};

const MAX_USERNAME_LEN: usize = 64;
const MAX_EMAIL_LEN: usize = 255;

/// Digest checked when the email matches no account.
static UNKNOWN_USER_DIGEST: Lazy<Option<String>> =
    Lazy::new(|| hash_password("fintrack-unknown-user").ok());

/// Registers users and exchanges credentials for session tokens.
///
/// Owns every rule around identities; the store only persists.
#[derive(Clone)]
pub struct UserDirectory {
    users: Arc<dyn UserStore>,
    tokens: Arc<JwtService>,
}

impl UserDirectory {
    /// Creates a directory over a user store and a token service.
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<JwtService>) -> Self {
        Self { users, tokens }
    }

    /// Registers a new user.
    ///
    /// The email is trimmed and lowercased before the uniqueness check. The
    /// password is hashed with Argon2id and the plaintext dropped.
    ///
    /// # Errors
    ///
    /// - `Validation` if a field is empty or malformed (no storage call is made)
    /// - `EmailAlreadyInUse` / `UsernameAlreadyInUse` on a duplicate
    /// - `Storage` if the email lookup fails
    /// - `Password` if hashing fails
    /// - `RegistrationFailed` if the insert fails
    pub async fn register(&self, input: RegisterInput) -> Result<User, DirectoryError> {
        let RegisterInput {
            username,
            email,
            password,
        } = input;
        let username = username.trim().to_string();
        let email = normalize_email(&email);
        validate_registration(&username, &email, &password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            info!(email = %email, "Registration rejected: email already in use");
            return Err(DirectoryError::EmailAlreadyInUse);
        }

        let password_hash = hash_off_executor(password).await?;

        let user = User {
            id: UserId::new(),
            username,
            email,
            password_hash,
            created_at: Utc::now(),
        };

        match self.users.insert(user).await {
            Ok(user) => {
                info!(user_id = %user.id, email = %user.email, "New user registered");
                Ok(user)
            }
            Err(RepositoryError::Conflict(field)) if field == "username" => {
                Err(DirectoryError::UsernameAlreadyInUse)
            }
            Err(RepositoryError::Conflict(_)) => Err(DirectoryError::EmailAlreadyInUse),
            Err(RepositoryError::Backend(msg)) => {
                error!(error = %msg, "Failed to create user");
                Err(DirectoryError::RegistrationFailed(msg))
            }
        }
    }

    /// Checks credentials and issues a session token.
    ///
    /// An unknown email, a wrong password, a storage failure during lookup
    /// and an unusable stored digest all produce the same
    /// `InvalidCredentials` value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` on any credential failure, or `Token` if
    /// the token cannot be signed.
    pub async fn authenticate(&self, credentials: Credentials) -> Result<AuthToken, DirectoryError> {
        let Credentials { email, password } = credentials;
        let email = normalize_email(&email);

        let user = match self.users.find_by_email(&email).await {
            Ok(user) => user,
            Err(e) => {
                error!(error = %e, "Storage error during login");
                None
            }
        };

        // Unknown emails still run one Argon2 verification.
        let stored = user.as_ref().map(|u| u.password_hash.clone());
        let verified = tokio::task::spawn_blocking(move || {
            match stored.or_else(|| UNKNOWN_USER_DIGEST.clone()) {
                Some(digest) => verify_password(&password, &digest),
                None => Ok(false),
            }
        })
        .await
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))
        .and_then(|result| result);

        let Some(user) = user else {
            info!("Login attempt for non-existent user");
            return Err(DirectoryError::InvalidCredentials);
        };

        match verified {
            Ok(true) => {}
            Ok(false) => {
                info!(user_id = %user.id, "Failed login attempt - invalid password");
                return Err(DirectoryError::InvalidCredentials);
            }
            Err(e) => {
                error!(user_id = %user.id, error = %e, "Password verification error");
                return Err(DirectoryError::InvalidCredentials);
            }
        }

        let token = self.tokens.issue_token(user.id)?;
        info!(user_id = %user.id, "User logged in successfully");

        Ok(AuthToken {
            token,
            expires_in: self.tokens.token_ttl_secs(),
        })
    }

    /// Looks a user up by ID.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the lookup fails.
    pub async fn find_user(&self, id: UserId) -> Result<Option<User>, DirectoryError> {
        Ok(self.users.find_by_id(id).await?)
    }
}

/// Argon2 is CPU-bound; keep it off the async workers.
async fn hash_off_executor(password: String) -> Result<String, DirectoryError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
        .map_err(DirectoryError::from)
}

fn validate_registration(username: &str, email: &str, password: &str) -> Result<(), DirectoryError> {
    if username.is_empty() {
        return Err(DirectoryError::Validation("Username is required".to_string()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(DirectoryError::Validation(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }

    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty() && !domain.contains('@'));
    if !well_formed || email.len() > MAX_EMAIL_LEN {
        return Err(DirectoryError::Validation(
            "A valid email address is required".to_string(),
        ));
    }

    if password.is_empty() {
        return Err(DirectoryError::Validation("Password is required".to_string()));
    }

    Ok(())
}
