//! Budget operations on [`LedgerService`].
//!
//! Every mutation checks its invariant first (duplicate category, ownership)
//! and then relies on the store's uniqueness constraint to settle races
//! between concurrent requests.

use chrono::Utc;
use tracing::{info, warn};

use fintrack_shared::types::{BudgetId, UserId};

use super::error::LedgerError;
use super::rules::{check_amount, normalize_category};
use super::service::LedgerService;
use super::types::{Budget, CreateBudgetInput, UpdateBudgetInput};
use crate::repository::RepositoryError;

/// A store-level uniqueness conflict on a budget can only be the category.
fn conflict_as_duplicate(err: RepositoryError, category: &str) -> LedgerError {
    match err {
        RepositoryError::Conflict(_) => LedgerError::DuplicateBudgetCategory(category.to_string()),
        other @ RepositoryError::Backend(_) => LedgerError::Storage(other),
    }
}

impl LedgerService {
    /// Creates a budget for `user_id`.
    ///
    /// # Errors
    ///
    /// - `Validation` / `NegativeAmount` on malformed input
    /// - `DuplicateBudgetCategory` if the user already budgets this category
    /// - `Storage` if a query fails
    pub async fn create_budget(
        &self,
        user_id: UserId,
        input: CreateBudgetInput,
    ) -> Result<Budget, LedgerError> {
        let category = normalize_category(&input.category)?;
        check_amount(input.limit)?;

        if self
            .budgets
            .count_by_user_and_category(user_id, &category)
            .await?
            > 0
        {
            info!(user_id = %user_id, category = %category, "Duplicate budget category rejected");
            return Err(LedgerError::DuplicateBudgetCategory(category));
        }

        let now = Utc::now();
        let budget = Budget {
            id: BudgetId::new(),
            user_id,
            category,
            limit: input.limit,
            period: input.period,
            created_at: now,
            updated_at: now,
        };

        let category = budget.category.clone();
        let budget = self
            .budgets
            .insert(budget)
            .await
            .map_err(|e| conflict_as_duplicate(e, &category))?;

        info!(user_id = %user_id, budget_id = %budget.id, "Budget created");
        Ok(budget)
    }

    /// Lists a user's budgets. An empty list is a success.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the query fails.
    pub async fn list_budgets(&self, user_id: UserId) -> Result<Vec<Budget>, LedgerError> {
        Ok(self.budgets.list_by_user(user_id).await?)
    }

    /// Replaces a budget's category, limit and period.
    ///
    /// Ownership is verified against the stored record, the same way
    /// [`delete_budget`](Self::delete_budget) does, and the write itself only
    /// matches a row still owned by `user_id`. A budget deleted in between is
    /// reported as not found rather than written back.
    ///
    /// # Errors
    ///
    /// - `Validation` / `NegativeAmount` on malformed input
    /// - `BudgetNotFound` if no budget with this ID belongs to `user_id`
    /// - `DuplicateBudgetCategory` if another of the user's budgets has the new category
    /// - `Storage` if a query fails
    pub async fn update_budget(
        &self,
        user_id: UserId,
        budget_id: BudgetId,
        input: UpdateBudgetInput,
    ) -> Result<Budget, LedgerError> {
        let category = normalize_category(&input.category)?;
        check_amount(input.limit)?;

        if !self.budgets.exists_by_id_and_user(budget_id, user_id).await? {
            warn!(user_id = %user_id, budget_id = %budget_id, "Budget update refused: not owned");
            return Err(LedgerError::BudgetNotFound(budget_id));
        }

        let owned = self.budgets.list_by_user(user_id).await?;
        if owned
            .iter()
            .any(|b| b.id != budget_id && b.category == category)
        {
            return Err(LedgerError::DuplicateBudgetCategory(category));
        }

        let now = Utc::now();
        let budget = Budget {
            id: budget_id,
            user_id,
            category,
            limit: input.limit,
            period: input.period,
            created_at: now,
            updated_at: now,
        };

        let category = budget.category.clone();
        let Some(budget) = self
            .budgets
            .update_owned(budget)
            .await
            .map_err(|e| conflict_as_duplicate(e, &category))?
        else {
            warn!(user_id = %user_id, budget_id = %budget_id, "Budget vanished before update");
            return Err(LedgerError::BudgetNotFound(budget_id));
        };

        info!(user_id = %user_id, budget_id = %budget.id, "Budget updated");
        Ok(budget)
    }

    /// Deletes a budget owned by `user_id`.
    ///
    /// # Errors
    ///
    /// - `BudgetNotFound` if no budget with this ID belongs to `user_id`; nothing is deleted
    /// - `Storage` if a query fails
    pub async fn delete_budget(&self, budget_id: BudgetId, user_id: UserId) -> Result<(), LedgerError> {
        if !self.budgets.exists_by_id_and_user(budget_id, user_id).await? {
            warn!(user_id = %user_id, budget_id = %budget_id, "Budget delete refused: not owned");
            return Err(LedgerError::BudgetNotFound(budget_id));
        }

        info!(user_id = %user_id, budget_id = %budget_id, "Budget found, proceeding to delete");
        self.budgets.delete_by_id(budget_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ledger::{BudgetPeriod, MAX_CATEGORY_LEN};
    use rust_decimal::Decimal;
    use crate::memory::{InMemoryBudgetStore, InMemoryTransactionStore};
    use crate::repository::BudgetStore;
    use rust_decimal_macros::dec;

    fn ledger() -> (LedgerService, Arc<InMemoryBudgetStore>) {
        let budgets = Arc::new(InMemoryBudgetStore::new());
        let ledger = LedgerService::new(Arc::new(InMemoryTransactionStore::new()), budgets.clone());
        (ledger, budgets)
    }

    fn create(category: &str, limit: Decimal) -> CreateBudgetInput {
        CreateBudgetInput {
            category: category.to_string(),
            limit,
            period: BudgetPeriod::Monthly,
        }
    }

    fn update(category: &str, limit: Decimal) -> UpdateBudgetInput {
        UpdateBudgetInput {
            category: category.to_string(),
            limit,
            period: BudgetPeriod::Yearly,
        }
    }

    #[tokio::test]
    async fn test_duplicate_category_rejected_for_same_user() {
        let (ledger, store) = ledger();
        let user = UserId::new();

        ledger.create_budget(user, create("food", dec!(300))).await.unwrap();
        let second = ledger.create_budget(user, create("food", dec!(500))).await;

        assert_eq!(
            second,
            Err(LedgerError::DuplicateBudgetCategory("food".to_string()))
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_other_user_may_reuse_category() {
        let (ledger, _) = ledger();

        ledger.create_budget(UserId::new(), create("food", dec!(300))).await.unwrap();
        let other = ledger.create_budget(UserId::new(), create("food", dec!(300))).await;

        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn test_create_budget_validates_input() {
        let (ledger, store) = ledger();
        let user = UserId::new();

        let blank = ledger.create_budget(user, create("  ", dec!(1))).await;
        assert!(matches!(blank, Err(LedgerError::Validation(_))));

        let negative = ledger.create_budget(user, create("rent", dec!(-1))).await;
        assert_eq!(negative, Err(LedgerError::NegativeAmount));

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_budget_rejected_before_storage() {
        let (ledger, store) = ledger();
        let owner = UserId::new();
        let long = "x".repeat(MAX_CATEGORY_LEN + 1);

        let long_category = ledger.create_budget(owner, create(&long, dec!(1))).await;
        assert!(matches!(long_category, Err(LedgerError::Validation(_))));

        let too_precise = ledger.create_budget(owner, create("food", dec!(0.00001))).await;
        assert!(matches!(too_precise, Err(LedgerError::Validation(_))));
        assert!(store.is_empty());

        let budget = ledger.create_budget(owner, create("food", dec!(10))).await.unwrap();
        let too_large = ledger
            .update_budget(owner, budget.id, update("food", dec!(1000000000000000)))
            .await;
        assert!(matches!(too_large, Err(LedgerError::Validation(_))));
        assert_eq!(ledger.list_budgets(owner).await.unwrap(), vec![budget]);
    }

    #[tokio::test]
    async fn test_delete_budget_of_other_user_is_not_found() {
        let (ledger, store) = ledger();
        let owner = UserId::new();
        let intruder = UserId::new();
        let budget = ledger.create_budget(owner, create("travel", dec!(900))).await.unwrap();

        let result = ledger.delete_budget(budget.id, intruder).await;

        assert_eq!(result, Err(LedgerError::BudgetNotFound(budget.id)));
        assert!(store.exists_by_id_and_user(budget.id, owner).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_budget_by_owner() {
        let (ledger, store) = ledger();
        let owner = UserId::new();
        let budget = ledger.create_budget(owner, create("travel", dec!(900))).await.unwrap();

        ledger.delete_budget(budget.id, owner).await.unwrap();

        assert!(store.is_empty());
        let again = ledger.delete_budget(budget.id, owner).await;
        assert_eq!(again, Err(LedgerError::BudgetNotFound(budget.id)));
    }

    #[tokio::test]
    async fn test_update_budget_by_owner() {
        let (ledger, _) = ledger();
        let owner = UserId::new();
        let budget = ledger.create_budget(owner, create("fun", dec!(50))).await.unwrap();

        let updated = ledger
            .update_budget(owner, budget.id, update("leisure", dec!(75)))
            .await
            .unwrap();

        assert_eq!(updated.id, budget.id);
        assert_eq!(updated.user_id, owner);
        assert_eq!(updated.category, "leisure");
        assert_eq!(updated.limit, dec!(75));
        assert_eq!(updated.period, BudgetPeriod::Yearly);
        assert_eq!(updated.created_at, budget.created_at);
        assert_eq!(ledger.list_budgets(owner).await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn test_update_budget_keeps_same_category() {
        let (ledger, _) = ledger();
        let owner = UserId::new();
        let budget = ledger.create_budget(owner, create("fun", dec!(50))).await.unwrap();

        let updated = ledger
            .update_budget(owner, budget.id, update("fun", dec!(60)))
            .await
            .unwrap();

        assert_eq!(updated.limit, dec!(60));
    }

    #[tokio::test]
    async fn test_update_budget_of_other_user_is_not_found() {
        let (ledger, _) = ledger();
        let owner = UserId::new();
        let intruder = UserId::new();
        let budget = ledger.create_budget(owner, create("fun", dec!(50))).await.unwrap();

        let result = ledger
            .update_budget(intruder, budget.id, update("fun", dec!(0)))
            .await;

        assert_eq!(result, Err(LedgerError::BudgetNotFound(budget.id)));
        assert!(ledger.list_budgets(intruder).await.unwrap().is_empty());
        assert_eq!(ledger.list_budgets(owner).await.unwrap(), vec![budget]);
    }

    #[tokio::test]
    async fn test_update_budget_missing_is_not_found() {
        let (ledger, store) = ledger();
        let missing = BudgetId::new();

        let result = ledger
            .update_budget(UserId::new(), missing, update("fun", dec!(1)))
            .await;

        assert_eq!(result, Err(LedgerError::BudgetNotFound(missing)));
        assert!(store.is_empty());
    }

    /// Budget store that deletes a budget right after confirming it exists.
    struct DeletedMidUpdate(Arc<InMemoryBudgetStore>);

    #[async_trait::async_trait]
    impl BudgetStore for DeletedMidUpdate {
        async fn count_by_user_and_category(
            &self,
            user_id: UserId,
            category: &str,
        ) -> Result<u64, RepositoryError> {
            self.0.count_by_user_and_category(user_id, category).await
        }

        async fn insert(&self, budget: Budget) -> Result<Budget, RepositoryError> {
            self.0.insert(budget).await
        }

        async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Budget>, RepositoryError> {
            self.0.list_by_user(user_id).await
        }

        async fn upsert(&self, budget: Budget) -> Result<Budget, RepositoryError> {
            self.0.upsert(budget).await
        }

        async fn update_owned(&self, budget: Budget) -> Result<Option<Budget>, RepositoryError> {
            self.0.update_owned(budget).await
        }

        async fn exists_by_id_and_user(
            &self,
            id: BudgetId,
            user_id: UserId,
        ) -> Result<bool, RepositoryError> {
            let exists = self.0.exists_by_id_and_user(id, user_id).await?;
            self.0.delete_by_id(id).await?;
            Ok(exists)
        }

        async fn delete_by_id(&self, id: BudgetId) -> Result<(), RepositoryError> {
            self.0.delete_by_id(id).await
        }
    }

    #[tokio::test]
    async fn test_update_budget_deleted_concurrently_is_not_recreated() {
        let inner = Arc::new(InMemoryBudgetStore::new());
        let ledger = LedgerService::new(
            Arc::new(InMemoryTransactionStore::new()),
            Arc::new(DeletedMidUpdate(inner.clone())),
        );
        let owner = UserId::new();
        let budget = ledger.create_budget(owner, create("fun", dec!(50))).await.unwrap();

        let result = ledger
            .update_budget(owner, budget.id, update("fun", dec!(60)))
            .await;

        assert_eq!(result, Err(LedgerError::BudgetNotFound(budget.id)));
        assert!(inner.is_empty());
    }

    #[tokio::test]
    async fn test_update_budget_into_taken_category() {
        let (ledger, _) = ledger();
        let owner = UserId::new();
        ledger.create_budget(owner, create("food", dec!(50))).await.unwrap();
        let rent = ledger.create_budget(owner, create("rent", dec!(900))).await.unwrap();

        let result = ledger
            .update_budget(owner, rent.id, update("food", dec!(900)))
            .await;

        assert_eq!(
            result,
            Err(LedgerError::DuplicateBudgetCategory("food".to_string()))
        );
    }

    #[tokio::test]
    async fn test_list_budgets_only_own() {
        let (ledger, _) = ledger();
        let owner = UserId::new();
        ledger.create_budget(owner, create("b", dec!(1))).await.unwrap();
        ledger.create_budget(owner, create("a", dec!(1))).await.unwrap();
        ledger.create_budget(UserId::new(), create("c", dec!(1))).await.unwrap();

        let categories: Vec<String> = ledger
            .list_budgets(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.category)
            .collect();
        assert_eq!(categories, vec!["a", "b"]);
    }
}
