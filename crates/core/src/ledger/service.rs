//! Ledger service: transaction recording and balance aggregation.
//!
//! Budget operations live in `budgets.rs` as a second `impl` block.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use fintrack_shared::types::{TransactionId, UserId};

use super::error::LedgerError;
use super::rules::{check_amount, normalize_category};
use super::types::{BalanceSummary, CreateTransactionInput, Transaction, TransactionType};
use crate::repository::{BudgetStore, TransactionStore};

/// Ledger service for a user's transactions and budgets.
#[derive(Clone)]
pub struct LedgerService {
    pub(super) transactions: Arc<dyn TransactionStore>,
    pub(super) budgets: Arc<dyn BudgetStore>,
}

impl LedgerService {
    /// Creates a ledger service over its stores.
    #[must_use]
    pub fn new(transactions: Arc<dyn TransactionStore>, budgets: Arc<dyn BudgetStore>) -> Self {
        Self {
            transactions,
            budgets,
        }
    }

    /// Records a transaction for `user_id`.
    ///
    /// # Errors
    ///
    /// - `InvalidTransactionType` unless the type is `income` or `expense`
    /// - `NegativeAmount` if the amount is below zero
    /// - `Validation` if the amount has too many digits or the category is
    ///   blank or too long
    /// - `Storage` if the insert fails
    pub async fn record_transaction(
        &self,
        user_id: UserId,
        input: CreateTransactionInput,
    ) -> Result<Transaction, LedgerError> {
        let transaction_type = TransactionType::from_str(&input.transaction_type)?;
        check_amount(input.amount)?;
        let category = normalize_category(&input.category)?;

        let transaction = Transaction {
            id: TransactionId::new(),
            user_id,
            amount: input.amount,
            transaction_type,
            date: input.date,
            category,
            description: input
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            created_at: Utc::now(),
        };

        let transaction = self.transactions.insert(transaction).await?;
        info!(
            user_id = %user_id,
            transaction_id = %transaction.id,
            transaction_type = %transaction.transaction_type,
            "Transaction recorded"
        );
        Ok(transaction)
    }

    /// Lists a user's transactions, newest date first. An empty list is a success.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the query fails.
    pub async fn list_transactions(&self, user_id: UserId) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self.transactions.list_by_user(user_id).await?)
    }

    /// Sum of the user's income.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the query fails.
    pub async fn total_income(&self, user_id: UserId) -> Result<Decimal, LedgerError> {
        Ok(self
            .transactions
            .sum_by_user_and_type(user_id, TransactionType::Income)
            .await?)
    }

    /// Sum of the user's expenses.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the query fails.
    pub async fn total_expense(&self, user_id: UserId) -> Result<Decimal, LedgerError> {
        Ok(self
            .transactions
            .sum_by_user_and_type(user_id, TransactionType::Expense)
            .await?)
    }

    /// Income minus expense; zero for a user with no transactions.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if a query fails.
    pub async fn total_balance(&self, user_id: UserId) -> Result<Decimal, LedgerError> {
        Ok(self.balance_summary(user_id).await?.balance)
    }

    /// Income, expense and balance in one call.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if a query fails.
    pub async fn balance_summary(&self, user_id: UserId) -> Result<BalanceSummary, LedgerError> {
        let income = self.total_income(user_id).await?;
        let expense = self.total_expense(user_id).await?;

        Ok(BalanceSummary {
            income,
            expense,
            balance: income - expense,
        })
    }
}
