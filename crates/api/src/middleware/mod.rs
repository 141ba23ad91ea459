//! Request middleware.

pub mod auth;

pub use auth::{AuthUser, GateError, auth_middleware, authenticate};
