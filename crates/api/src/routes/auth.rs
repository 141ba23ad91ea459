//! Registration, login and the current-user endpoint.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use fintrack_core::directory::{Credentials, RegisterInput, UserProfile};
use fintrack_shared::AppError;

/// Creates the public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Creates the auth routes that sit behind the authentication gate.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

/// Registration request body.
#[derive(Deserialize)]
pub struct RegisterRequest {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Login request body.
#[derive(Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Response carrying the public view of a user.
#[derive(Serialize)]
pub struct UserResponse {
    /// The user.
    pub user: UserProfile,
}

/// Successful login response.
#[derive(Serialize)]
pub struct LoginResponse {
    /// Session token.
    pub token: String,
    /// Always `"Bearer"`.
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// POST /auth/register - Register a new user.
async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(payload) = payload?;

    let user = state
        .directory
        .register(RegisterInput {
            username: payload.username,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            user: user.profile(),
        }),
    ))
}

/// POST /auth/login - Exchange credentials for a session token.
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload?;

    let token = state
        .directory
        .authenticate(Credentials {
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        token: token.token,
        token_type: "Bearer",
        expires_in: token.expires_in,
    }))
}

/// GET /me - The authenticated user.
async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .directory
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    info!(user_id = %user_id, "Profile requested");
    Ok(Json(UserResponse {
        user: user.profile(),
    }))
}
