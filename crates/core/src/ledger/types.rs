//! Ledger domain types: transactions, budgets and their inputs.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fintrack_shared::types::{BudgetId, TransactionId, UserId};

use super::error::LedgerError;

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl TransactionType {
    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(LedgerError::InvalidTransactionType(s.to_string())),
        }
    }
}

/// A recorded income or expense. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Owning user.
    pub user_id: UserId,
    /// Non-negative magnitude; the sign comes from `transaction_type`.
    pub amount: Decimal,
    /// Income or expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Date the money moved.
    pub date: NaiveDate,
    /// Category label.
    pub category: String,
    /// Free-form description.
    pub description: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns the amount with income positive and expense negative.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// Input for recording a transaction.
///
/// `transaction_type` is the raw value received from the caller; it is
/// parsed (and rejected if unknown) by the ledger service.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Amount, must not be negative.
    pub amount: Decimal,
    /// `"income"` or `"expense"`.
    pub transaction_type: String,
    /// Date the money moved.
    pub date: NaiveDate,
    /// Category label.
    pub category: String,
    /// Free-form description.
    pub description: Option<String>,
}

/// Income, expense and net balance for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceSummary {
    /// Sum of income amounts.
    pub income: Decimal,
    /// Sum of expense amounts.
    pub expense: Decimal,
    /// `income - expense`.
    pub balance: Decimal,
}

/// Budget period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    /// Weekly budget.
    Weekly,
    /// Monthly budget.
    Monthly,
    /// Quarterly budget.
    Quarterly,
    /// Yearly budget.
    Yearly,
}

impl BudgetPeriod {
    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// Parses the storage representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "quarterly" => Some(Self::Quarterly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A spending limit for one category. Categories are unique per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Owning user.
    pub user_id: UserId,
    /// Category, unique among the owner's budgets.
    pub category: String,
    /// Spending limit.
    pub limit: Decimal,
    /// Period the limit applies to.
    pub period: BudgetPeriod,
    /// Created at timestamp.
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    /// Category.
    pub category: String,
    /// Spending limit, must not be negative.
    pub limit: Decimal,
    /// Period.
    pub period: BudgetPeriod,
}

/// Replacement values for an existing budget.
#[derive(Debug, Clone)]
pub struct UpdateBudgetInput {
    /// Category.
    pub category: String,
    /// Spending limit, must not be negative.
    pub limit: Decimal,
    /// Period.
    pub period: BudgetPeriod,
}
