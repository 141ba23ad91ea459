//! Ledger error types.

use thiserror::Error;

use fintrack_shared::AppError;
use fintrack_shared::types::BudgetId;

use crate::repository::RepositoryError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Transaction type is neither income nor expense.
    #[error("Invalid transaction type: {0:?} (expected \"income\" or \"expense\")")]
    InvalidTransactionType(String),

    /// Amount cannot be negative.
    #[error("Amount cannot be negative")]
    NegativeAmount,

    /// Other malformed input.
    #[error("{0}")]
    Validation(String),

    // ========== Budget Errors ==========
    /// The user already has a budget for this category.
    #[error("A budget for category {0:?} already exists")]
    DuplicateBudgetCategory(String),

    /// No budget with this ID belongs to the caller.
    #[error("Budget not found: {0}")]
    BudgetNotFound(BudgetId),

    // ========== Infrastructure ==========
    /// Storage failure.
    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidTransactionType(_)
            | LedgerError::NegativeAmount
            | LedgerError::Validation(_) => Self::Validation(err.to_string()),
            LedgerError::DuplicateBudgetCategory(_) => Self::Conflict(err.to_string()),
            LedgerError::BudgetNotFound(_) => Self::NotFound("Budget not found".to_string()),
            LedgerError::Storage(e) => e.into(),
        }
    }
}
