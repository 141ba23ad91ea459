//! In-memory stores implementing the storage traits.
//!
//! Intended for tests and local development. Each store enforces the same
//! uniqueness constraints as the SQL schema, under a single lock, so
//! check-then-act races resolve the same way they do against Postgres.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use rust_decimal::Decimal;

use fintrack_shared::types::{BudgetId, UserId};

use crate::directory::User;
use crate::ledger::{Budget, Transaction, TransactionType};
use crate::repository::{BudgetStore, RepositoryError, TransactionStore, UserStore};

fn poisoned() -> RepositoryError {
    RepositoryError::Backend("lock poisoned".to_string())
}

/// In-memory user store.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepositoryError> {
        let mut users = self.users.write().map_err(|_| poisoned())?;

        if users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("email".to_string()));
        }
        if users.values().any(|u| u.username == user.username) {
            return Err(RepositoryError::Conflict("username".to_string()));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }
}

/// In-memory transaction store.
#[derive(Debug, Default)]
pub struct InMemoryTransactionStore {
    transactions: RwLock<Vec<Transaction>>,
}

impl InMemoryTransactionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn insert(&self, transaction: Transaction) -> Result<Transaction, RepositoryError> {
        let mut transactions = self.transactions.write().map_err(|_| poisoned())?;
        transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Transaction>, RepositoryError> {
        let transactions = self.transactions.read().map_err(|_| poisoned())?;
        let mut owned: Vec<Transaction> = transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(owned)
    }

    async fn sum_by_user_and_type(
        &self,
        user_id: UserId,
        transaction_type: TransactionType,
    ) -> Result<Decimal, RepositoryError> {
        let transactions = self.transactions.read().map_err(|_| poisoned())?;
        Ok(transactions
            .iter()
            .filter(|t| t.user_id == user_id && t.transaction_type == transaction_type)
            .map(|t| t.amount)
            .sum())
    }
}

/// In-memory budget store.
#[derive(Debug, Default)]
pub struct InMemoryBudgetStore {
    budgets: RwLock<HashMap<BudgetId, Budget>>,
}

impl InMemoryBudgetStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored budgets across all users.
    pub fn len(&self) -> usize {
        self.budgets.read().map(|b| b.len()).unwrap_or_default()
    }

    /// Returns true if no budgets are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn category_taken(budgets: &HashMap<BudgetId, Budget>, candidate: &Budget) -> bool {
    budgets.values().any(|b| {
        b.id != candidate.id && b.user_id == candidate.user_id && b.category == candidate.category
    })
}

#[async_trait]
impl BudgetStore for InMemoryBudgetStore {
    async fn count_by_user_and_category(
        &self,
        user_id: UserId,
        category: &str,
    ) -> Result<u64, RepositoryError> {
        let budgets = self.budgets.read().map_err(|_| poisoned())?;
        let count = budgets
            .values()
            .filter(|b| b.user_id == user_id && b.category == category)
            .count();
        Ok(count as u64)
    }

    async fn insert(&self, budget: Budget) -> Result<Budget, RepositoryError> {
        let mut budgets = self.budgets.write().map_err(|_| poisoned())?;
        if category_taken(&budgets, &budget) {
            return Err(RepositoryError::Conflict("category".to_string()));
        }
        budgets.insert(budget.id, budget.clone());
        Ok(budget)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Budget>, RepositoryError> {
        let budgets = self.budgets.read().map_err(|_| poisoned())?;
        let mut owned: Vec<Budget> = budgets
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(owned)
    }

    async fn upsert(&self, budget: Budget) -> Result<Budget, RepositoryError> {
        let mut budgets = self.budgets.write().map_err(|_| poisoned())?;
        if category_taken(&budgets, &budget) {
            return Err(RepositoryError::Conflict("category".to_string()));
        }
        budgets.insert(budget.id, budget.clone());
        Ok(budget)
    }

    async fn update_owned(&self, budget: Budget) -> Result<Option<Budget>, RepositoryError> {
        let mut budgets = self.budgets.write().map_err(|_| poisoned())?;
        if category_taken(&budgets, &budget) {
            return Err(RepositoryError::Conflict("category".to_string()));
        }
        let Some(stored) = budgets
            .get_mut(&budget.id)
            .filter(|b| b.user_id == budget.user_id)
        else {
            return Ok(None);
        };
        stored.category = budget.category;
        stored.limit = budget.limit;
        stored.period = budget.period;
        stored.updated_at = budget.updated_at;
        Ok(Some(stored.clone()))
    }

    async fn exists_by_id_and_user(
        &self,
        id: BudgetId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let budgets = self.budgets.read().map_err(|_| poisoned())?;
        Ok(budgets.get(&id).is_some_and(|b| b.user_id == user_id))
    }

    async fn delete_by_id(&self, id: BudgetId) -> Result<(), RepositoryError> {
        let mut budgets = self.budgets.write().map_err(|_| poisoned())?;
        budgets.remove(&id);
        Ok(())
    }
}
