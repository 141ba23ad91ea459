//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - The authentication gate middleware and `AuthUser` extractor
//! - Mapping from domain errors to JSON error responses

pub mod error;
pub mod middleware;
pub mod routes;

#[cfg(test)]
mod test_helpers;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use fintrack_core::directory::UserDirectory;
use fintrack_core::ledger::LedgerService;
use fintrack_core::repository::{BudgetStore, TransactionStore, UserStore};
use fintrack_shared::JwtService;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// JWT service used by the authentication gate.
    pub jwt_service: Arc<JwtService>,
    /// Registration and login.
    pub directory: Arc<UserDirectory>,
    /// Transactions, balances and budgets.
    pub ledger: Arc<LedgerService>,
}

impl AppState {
    /// Wires the services over the given stores.
    #[must_use]
    pub fn new(
        jwt_service: Arc<JwtService>,
        users: Arc<dyn UserStore>,
        transactions: Arc<dyn TransactionStore>,
        budgets: Arc<dyn BudgetStore>,
    ) -> Self {
        Self {
            directory: Arc::new(UserDirectory::new(users, Arc::clone(&jwt_service))),
            ledger: Arc::new(LedgerService::new(transactions, budgets)),
            jwt_service,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
