//! Budget repository for database operations.
//!
//! `UNIQUE (user_id, category)` backs the per-user category invariant; a
//! violation surfaces as `RepositoryError::Conflict("category")`.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use fintrack_core::ledger::{Budget, BudgetPeriod};
use fintrack_core::repository::{BudgetStore, RepositoryError};
use fintrack_shared::types::{BudgetId, UserId};

use super::{corrupt_row, storage_error};
use crate::entities::budgets;

/// Budget repository backed by Postgres.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: budgets::Model) -> Result<Budget, RepositoryError> {
    let period = BudgetPeriod::parse(&model.period)
        .ok_or_else(|| corrupt_row("budgets", format!("unknown period {:?}", model.period)))?;

    Ok(Budget {
        id: BudgetId::from_uuid(model.id),
        user_id: UserId::from_uuid(model.user_id),
        category: model.category,
        limit: model.limit.normalize(),
        period,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

fn to_active(budget: Budget) -> budgets::ActiveModel {
    budgets::ActiveModel {
        id: Set(budget.id.into_inner()),
        user_id: Set(budget.user_id.into_inner()),
        category: Set(budget.category),
        limit: Set(budget.limit),
        period: Set(budget.period.as_str().to_string()),
        created_at: Set(budget.created_at.into()),
        updated_at: Set(budget.updated_at.into()),
    }
}

#[async_trait]
impl BudgetStore for BudgetRepository {
    async fn count_by_user_and_category(
        &self,
        user_id: UserId,
        category: &str,
    ) -> Result<u64, RepositoryError> {
        budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id.into_inner()))
            .filter(budgets::Column::Category.eq(category))
            .count(&self.db)
            .await
            .map_err(storage_error)
    }

    async fn insert(&self, budget: Budget) -> Result<Budget, RepositoryError> {
        let model = to_active(budget)
            .insert(&self.db)
            .await
            .map_err(storage_error)?;
        to_domain(model)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Budget>, RepositoryError> {
        budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id.into_inner()))
            .order_by_asc(budgets::Column::Category)
            .all(&self.db)
            .await
            .map_err(storage_error)?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn upsert(&self, budget: Budget) -> Result<Budget, RepositoryError> {
        let model = budgets::Entity::insert(to_active(budget))
            .on_conflict(
                OnConflict::column(budgets::Column::Id)
                    .update_columns([
                        budgets::Column::UserId,
                        budgets::Column::Category,
                        budgets::Column::Limit,
                        budgets::Column::Period,
                        budgets::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(storage_error)?;
        to_domain(model)
    }

    async fn update_owned(&self, budget: Budget) -> Result<Option<Budget>, RepositoryError> {
        let result = budgets::Entity::update_many()
            .col_expr(budgets::Column::Category, Expr::value(budget.category))
            .col_expr(budgets::Column::Limit, Expr::value(budget.limit))
            .col_expr(
                budgets::Column::Period,
                Expr::value(budget.period.as_str().to_string()),
            )
            .col_expr(budgets::Column::UpdatedAt, Expr::value(budget.updated_at))
            .filter(budgets::Column::Id.eq(budget.id.into_inner()))
            .filter(budgets::Column::UserId.eq(budget.user_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(storage_error)?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        budgets::Entity::find_by_id(budget.id.into_inner())
            .one(&self.db)
            .await
            .map_err(storage_error)?
            .map(to_domain)
            .transpose()
    }

    async fn exists_by_id_and_user(
        &self,
        id: BudgetId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let count = budgets::Entity::find_by_id(id.into_inner())
            .filter(budgets::Column::UserId.eq(user_id.into_inner()))
            .count(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(count > 0)
    }

    async fn delete_by_id(&self, id: BudgetId) -> Result<(), RepositoryError> {
        budgets::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(())
    }
}
