//! Income/expense ledger and per-category budgets.
//!
//! Transactions are append-only. Budgets carry two invariants the service
//! enforces before touching storage: a user's budget categories are pairwise
//! distinct, and only the owner may update or delete a budget.

pub mod error;
pub mod service;
pub mod types;

mod budgets;
mod rules;

#[cfg(test)]
mod service_props;

pub use error::LedgerError;
pub use rules::{MAX_AMOUNT_INTEGER_DIGITS, MAX_AMOUNT_SCALE, MAX_CATEGORY_LEN};
pub use service::LedgerService;
pub use types::{
    BalanceSummary, Budget, BudgetPeriod, CreateBudgetInput, CreateTransactionInput, Transaction,
    TransactionType, UpdateBudgetInput,
};
