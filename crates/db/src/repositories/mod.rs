//! Repository implementations of the core storage traits.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod budget;
pub mod transaction;
pub mod user;

pub use budget::BudgetRepository;
pub use transaction::TransactionRepository;
pub use user::UserRepository;

use sea_orm::{DbErr, SqlErr};
use tracing::debug;

use fintrack_core::repository::RepositoryError;

/// Maps a unique constraint name from the schema to the field it guards.
fn conflict_field(detail: &str) -> &'static str {
    if detail.contains("uq_users_email") {
        "email"
    } else if detail.contains("uq_users_username") {
        "username"
    } else if detail.contains("uq_budgets_user_category") {
        "category"
    } else {
        "record"
    }
}

/// Converts a `SeaORM` error into the storage error the core understands.
pub(crate) fn storage_error(err: DbErr) -> RepositoryError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            let field = conflict_field(&detail);
            debug!(field, "Unique constraint violated");
            RepositoryError::Conflict(field.to_string())
        }
        _ => RepositoryError::Backend(err.to_string()),
    }
}

/// A stored row that no longer maps onto the domain model.
pub(crate) fn corrupt_row(table: &str, detail: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Backend(format!("corrupt row in {table}: {detail}"))
}
