//! Storage capability traits.
//!
//! Each entity gets its own narrow trait. Services depend on these traits
//! only; `fintrack-db` implements them over Postgres and [`crate::memory`]
//! implements them in process. Business rules never live in an implementation.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use fintrack_shared::AppError;
use fintrack_shared::types::{BudgetId, UserId};

use crate::directory::User;
use crate::ledger::{Budget, Transaction, TransactionType};

/// Errors reported by a storage implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// A uniqueness constraint rejected the write. Carries the field name
    /// (`email`, `username`, `category`).
    #[error("unique constraint violated on {0}")]
    Conflict(String),

    /// Connection or query failure.
    #[error("storage failure: {0}")]
    Backend(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(field) => Self::Conflict(format!("{field} already exists")),
            RepositoryError::Backend(msg) => Self::Database(msg),
        }
    }
}

/// User storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by (normalized) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Inserts a new user. Fails with `Conflict` on a duplicate email or username.
    async fn insert(&self, user: User) -> Result<User, RepositoryError>;
}

/// Transaction storage.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Inserts a transaction.
    async fn insert(&self, transaction: Transaction) -> Result<Transaction, RepositoryError>;

    /// Lists a user's transactions, newest date first.
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Transaction>, RepositoryError>;

    /// Sums a user's amounts of one type; zero when there are none.
    async fn sum_by_user_and_type(
        &self,
        user_id: UserId,
        transaction_type: TransactionType,
    ) -> Result<Decimal, RepositoryError>;
}

/// Budget storage.
#[async_trait]
pub trait BudgetStore: Send + Sync {
    /// Counts a user's budgets with exactly this category.
    async fn count_by_user_and_category(
        &self,
        user_id: UserId,
        category: &str,
    ) -> Result<u64, RepositoryError>;

    /// Inserts a budget. Fails with `Conflict` if the category is taken for the user.
    async fn insert(&self, budget: Budget) -> Result<Budget, RepositoryError>;

    /// Lists a user's budgets.
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Budget>, RepositoryError>;

    /// Writes the budget by identity, inserting it if absent.
    async fn upsert(&self, budget: Budget) -> Result<Budget, RepositoryError>;

    /// Overwrites category, limit, period and `updated_at` of the budget with
    /// this ID, only while it is still owned by `budget.user_id`.
    ///
    /// Returns `None` when no such row exists; nothing is inserted. Fails with
    /// `Conflict` if the category is taken by another of the user's budgets.
    async fn update_owned(&self, budget: Budget) -> Result<Option<Budget>, RepositoryError>;

    /// Returns true if a budget with this ID is owned by `user_id`.
    async fn exists_by_id_and_user(
        &self,
        id: BudgetId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError>;

    /// Deletes a budget by ID. Deleting a missing budget is not an error.
    async fn delete_by_id(&self, id: BudgetId) -> Result<(), RepositoryError>;
}
