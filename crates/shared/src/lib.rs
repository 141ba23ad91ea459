//! Shared types, errors, and configuration for Fintrack.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management
//! - Session token issuance and verification (HS256 JWT)

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
