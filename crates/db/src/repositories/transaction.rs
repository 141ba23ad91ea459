//! Transaction repository for database operations.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use fintrack_core::ledger::{Transaction, TransactionType};
use fintrack_core::repository::{RepositoryError, TransactionStore};
use fintrack_shared::types::{TransactionId, UserId};

use super::{corrupt_row, storage_error};
use crate::entities::transactions;

/// Transaction repository backed by Postgres.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: transactions::Model) -> Result<Transaction, RepositoryError> {
    let transaction_type = TransactionType::from_str(&model.transaction_type)
        .map_err(|e| corrupt_row("transactions", e))?;

    Ok(Transaction {
        id: TransactionId::from_uuid(model.id),
        user_id: UserId::from_uuid(model.user_id),
        amount: model.amount.normalize(),
        transaction_type,
        date: model.date,
        category: model.category,
        description: model.description,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn insert(&self, transaction: Transaction) -> Result<Transaction, RepositoryError> {
        let model = transactions::ActiveModel {
            id: Set(transaction.id.into_inner()),
            user_id: Set(transaction.user_id.into_inner()),
            amount: Set(transaction.amount),
            transaction_type: Set(transaction.transaction_type.as_str().to_string()),
            date: Set(transaction.date),
            category: Set(transaction.category),
            description: Set(transaction.description),
            created_at: Set(transaction.created_at.into()),
        };

        let model = model.insert(&self.db).await.map_err(storage_error)?;
        to_domain(model)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Transaction>, RepositoryError> {
        transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id.into_inner()))
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(storage_error)?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn sum_by_user_and_type(
        &self,
        user_id: UserId,
        transaction_type: TransactionType,
    ) -> Result<Decimal, RepositoryError> {
        // SUM over zero rows is NULL
        let total: Option<Option<Decimal>> = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id.into_inner()))
            .filter(transactions::Column::TransactionType.eq(transaction_type.as_str()))
            .select_only()
            .column_as(transactions::Column::Amount.sum(), "total")
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(total.flatten().unwrap_or(Decimal::ZERO).normalize())
    }
}
