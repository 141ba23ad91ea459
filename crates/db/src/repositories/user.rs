//! User repository for database operations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use fintrack_core::directory::User;
use fintrack_core::repository::{RepositoryError, UserStore};
use fintrack_shared::types::UserId;

use super::storage_error;
use crate::entities::users;

/// User repository backed by Postgres.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: users::Model) -> User {
    User {
        id: UserId::from_uuid(model.id),
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(user.map(to_domain))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = users::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(user.map(to_domain))
    }

    async fn insert(&self, user: User) -> Result<User, RepositoryError> {
        let model = users::ActiveModel {
            id: Set(user.id.into_inner()),
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            created_at: Set(user.created_at.into()),
        };

        model
            .insert(&self.db)
            .await
            .map(to_domain)
            .map_err(storage_error)
    }
}
