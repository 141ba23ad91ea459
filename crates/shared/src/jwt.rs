//! Session token generation and validation.
//!
//! Tokens are stateless HS256 JWTs asserting a user identity for a fixed
//! lifetime. There is no server-side revocation: a token is valid exactly
//! when its signature checks out and its expiry has not been reached.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::auth::Claims;
use crate::clock::{Clock, SystemClock};
use crate::types::UserId;

/// The only algorithm tokens are signed with and accepted under.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Longest configurable token lifetime (one year).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// JWT configuration.
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Token lifetime in hours.
    pub token_ttl_hours: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[hidden]")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .finish()
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    /// No signing secret was configured.
    #[error("signing secret is not configured")]
    MissingSecret,

    /// Configured token lifetime is not positive or exceeds [`MAX_TOKEN_TTL_HOURS`].
    #[error("token lifetime must be between 1 and {MAX_TOKEN_TTL_HOURS} hours, got {0}")]
    InvalidLifetime(i64),

    /// Token encoding failed.
    #[error("failed to sign token: {0}")]
    SigningFailed(String),

    /// Token is malformed, uses another algorithm, or has a bad signature.
    #[error("invalid token")]
    InvalidToken,

    /// Token signature is valid but its expiry has passed.
    #[error("token has expired")]
    ExpiredToken,
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("config", &self.config)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .field("clock", &self.clock)
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service using the system clock.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::MissingSecret` if the configured secret is empty,
    /// `JwtError::InvalidLifetime` if the lifetime is out of range.
    pub fn new(config: JwtConfig) -> Result<Self, JwtError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a new JWT service reading time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::MissingSecret` if the configured secret is empty,
    /// `JwtError::InvalidLifetime` if the lifetime is out of range.
    pub fn with_clock(config: JwtConfig, clock: Arc<dyn Clock>) -> Result<Self, JwtError> {
        if config.secret.is_empty() {
            return Err(JwtError::MissingSecret);
        }
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&config.token_ttl_hours) {
            return Err(JwtError::InvalidLifetime(config.token_ttl_hours));
        }
        let ttl = Duration::try_hours(config.token_ttl_hours)
            .ok_or(JwtError::InvalidLifetime(config.token_ttl_hours))?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Ok(Self {
            config,
            ttl,
            encoding_key,
            decoding_key,
            clock,
        })
    }

    /// Issues a session token for a user, valid for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::SigningFailed` if token generation fails.
    pub fn issue_token(&self, user_id: UserId) -> Result<String, JwtError> {
        let issued_at = self.clock.now();
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| JwtError::SigningFailed("expiry out of range".to_string()))?;
        let claims = Claims::new(user_id, issued_at, expires_at);

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| JwtError::SigningFailed(e.to_string()))
    }

    /// Verifies a token and returns the user it was issued to.
    ///
    /// Only HS256 is accepted; tokens declaring any other algorithm are
    /// rejected before the signature is looked at. Expiry is checked against
    /// the service clock rather than inside the decoder.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::InvalidToken` if the token is malformed, signed with
    /// another algorithm or key. Returns `JwtError::ExpiredToken` if the
    /// signature is valid but the token has expired.
    pub fn verify_token(&self, token: &str) -> Result<UserId, JwtError> {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.validate_exp = false;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| JwtError::InvalidToken)?;

        if claims.is_expired_at(self.clock.now()) {
            return Err(JwtError::ExpiredToken);
        }

        Ok(claims.user_id())
    }

    /// Returns the token lifetime in seconds.
    #[must_use]
    pub fn token_ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{DateTime, Utc};

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            token_ttl_hours: 24,
        }
    }

    fn service_at(secret: &str, now: DateTime<Utc>) -> JwtService {
        JwtService::with_clock(config(secret), Arc::new(FixedClock(now))).unwrap()
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let result = JwtService::new(config(""));
        assert!(matches!(result, Err(JwtError::MissingSecret)));
    }

    #[test]
    fn test_non_positive_lifetime_is_rejected() {
        for hours in [0, -1, i64::MIN] {
            let result = JwtService::new(JwtConfig {
                secret: "secret".to_string(),
                token_ttl_hours: hours,
            });
            assert_eq!(result.err(), Some(JwtError::InvalidLifetime(hours)));
        }
    }

    #[test]
    fn test_oversized_lifetime_is_rejected() {
        for hours in [MAX_TOKEN_TTL_HOURS + 1, i64::MAX / 2, i64::MAX] {
            let result = JwtService::new(JwtConfig {
                secret: "secret".to_string(),
                token_ttl_hours: hours,
            });
            assert_eq!(result.err(), Some(JwtError::InvalidLifetime(hours)));
        }
    }

    #[test]
    fn test_longest_lifetime_issues_verifiable_token() {
        let service = JwtService::new(JwtConfig {
            secret: "secret".to_string(),
            token_ttl_hours: MAX_TOKEN_TTL_HOURS,
        })
        .unwrap();
        let user_id = UserId::new();

        let token = service.issue_token(user_id).unwrap();
        assert_eq!(service.verify_token(&token).unwrap(), user_id);
        assert_eq!(service.token_ttl_secs(), MAX_TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn test_issue_then_verify_returns_user() {
        let service = JwtService::new(config("test-secret-key-for-testing")).unwrap();
        let user_id = UserId::new();

        let token = service.issue_token(user_id).unwrap();
        assert!(!token.is_empty());
        assert_eq!(service.verify_token(&token).unwrap(), user_id);
    }

    #[test]
    fn test_token_valid_until_just_before_expiry() {
        let issued = Utc::now();
        let user_id = UserId::new();
        let token = service_at("secret", issued).issue_token(user_id).unwrap();

        let later = service_at("secret", issued + Duration::hours(23) + Duration::minutes(59));
        assert_eq!(later.verify_token(&token).unwrap(), user_id);
    }

    #[test]
    fn test_token_expires_after_24_hours() {
        let issued = Utc::now();
        let token = service_at("secret", issued)
            .issue_token(UserId::new())
            .unwrap();

        let at_expiry = service_at("secret", issued + Duration::hours(24));
        assert_eq!(at_expiry.verify_token(&token), Err(JwtError::ExpiredToken));

        let next_day = service_at("secret", issued + Duration::hours(25));
        assert_eq!(next_day.verify_token(&token), Err(JwtError::ExpiredToken));
    }

    #[test]
    fn test_token_from_other_secret_is_invalid() {
        let now = Utc::now();
        let token = service_at("secret-a", now)
            .issue_token(UserId::new())
            .unwrap();

        let result = service_at("secret-b", now).verify_token(&token);
        assert_eq!(result, Err(JwtError::InvalidToken));
    }

    #[test]
    fn test_expired_token_from_other_secret_is_invalid_not_expired() {
        let issued = Utc::now();
        let token = service_at("secret-a", issued)
            .issue_token(UserId::new())
            .unwrap();

        let result = service_at("secret-b", issued + Duration::days(3)).verify_token(&token);
        assert_eq!(result, Err(JwtError::InvalidToken));
    }

    #[test]
    fn test_other_algorithm_is_rejected() {
        let now = Utc::now();
        let claims = Claims::new(UserId::new(), now, now + Duration::hours(1));
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        let result = service_at("secret", now).verify_token(&token);
        assert_eq!(result, Err(JwtError::InvalidToken));
    }

    #[test]
    fn test_unsigned_token_is_rejected() {
        // {"alg":"none","typ":"JWT"} . {"sub":"1"} . <empty signature>
        let token = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.eyJzdWIiOiIxIn0.";
        let result = service_at("secret", Utc::now()).verify_token(token);
        assert_eq!(result, Err(JwtError::InvalidToken));
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let service = service_at("secret", Utc::now());
        let mut token = service.issue_token(UserId::new()).unwrap();
        let last = token.pop().unwrap();
        token.push(if last == 'A' { 'B' } else { 'A' });

        assert_eq!(service.verify_token(&token), Err(JwtError::InvalidToken));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let service = service_at("secret", Utc::now());
        assert_eq!(
            service.verify_token("invalid.token.here"),
            Err(JwtError::InvalidToken)
        );
        assert_eq!(service.verify_token(""), Err(JwtError::InvalidToken));
    }

    #[test]
    fn test_debug_hides_secret() {
        let service = service_at("super-secret-value", Utc::now());
        let rendered = format!("{service:?}");
        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("[hidden]"));
    }

    #[test]
    fn test_token_ttl_secs() {
        let service = service_at("secret", Utc::now());
        assert_eq!(service.token_ttl_secs(), 86_400);
    }
}
