//! Authentication gate for protected routes.
//!
//! The gate turns an `Authorization: Bearer <token>` header into the
//! [`UserId`] the token was issued to. Expired and otherwise invalid tokens
//! are rejected identically; the reason is only logged.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::debug;

use crate::AppState;
use crate::error::ErrorBody;
use fintrack_shared::JwtService;
use fintrack_shared::types::UserId;

/// Why the gate refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateError {
    /// No `Authorization` header, or not a bearer credential.
    #[error("Authorization header with Bearer token is required")]
    MissingCredentials,

    /// The token failed verification.
    #[error("Invalid or expired token")]
    Unauthenticated,
}

impl GateError {
    const fn error_code(self) -> &'static str {
        match self {
            Self::MissingCredentials => "MISSING_TOKEN",
            Self::Unauthenticated => "INVALID_TOKEN",
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Extracts the token from a bearer credential. The scheme is case-insensitive.
fn extract_bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Resolves the caller from the raw `Authorization` header value.
///
/// # Errors
///
/// - `MissingCredentials` if the header is absent or not a bearer credential
/// - `Unauthenticated` if the token is malformed, forged or expired
pub fn authenticate(jwt: &JwtService, header: Option<&str>) -> Result<UserId, GateError> {
    let token = header
        .and_then(extract_bearer_token)
        .ok_or(GateError::MissingCredentials)?;

    jwt.verify_token(token).map_err(|e| {
        debug!(error = %e, "Token rejected");
        GateError::Unauthenticated
    })
}

/// Authentication middleware.
///
/// On success the caller's ID is stored as [`AuthUser`] in the extensions of
/// this request only; otherwise the request is answered with 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match authenticate(&state.jwt_service, header) {
        Ok(user_id) => {
            request.extensions_mut().insert(AuthUser(user_id));
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Extractor for the authenticated caller.
///
/// ```ignore
/// async fn handler(AuthUser(user_id): AuthUser) -> impl IntoResponse {
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub UserId);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .copied()
            .ok_or(GateError::Unauthenticated)
    }
}
