//! Initial schema: users, transactions and budgets.
//!
//! Constraint names are matched by the repositories when translating
//! unique violations, so renaming one here means updating
//! `repositories::conflict_field` too.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(SCHEMA_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS budgets CASCADE;
             DROP TABLE IF EXISTS transactions CASCADE;
             DROP TABLE IF EXISTS users CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const SCHEMA_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    username VARCHAR(64) NOT NULL,
    email VARCHAR(255) NOT NULL,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_users_username UNIQUE (username),
    CONSTRAINT uq_users_email UNIQUE (email)
);

CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    amount NUMERIC(19, 4) NOT NULL,
    type VARCHAR(16) NOT NULL,
    date DATE NOT NULL,
    category VARCHAR(100) NOT NULL,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_transactions_amount_non_negative CHECK (amount >= 0),
    CONSTRAINT chk_transactions_type CHECK (type IN ('income', 'expense'))
);

-- Listing is always per user, newest first
CREATE INDEX idx_transactions_user_date ON transactions(user_id, date DESC, created_at DESC);

-- Balance sums per user and type
CREATE INDEX idx_transactions_user_type ON transactions(user_id, type);

CREATE TABLE budgets (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    category VARCHAR(100) NOT NULL,
    limit_amount NUMERIC(19, 4) NOT NULL,
    period VARCHAR(16) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_budgets_user_category UNIQUE (user_id, category),
    CONSTRAINT chk_budgets_limit_non_negative CHECK (limit_amount >= 0),
    CONSTRAINT chk_budgets_period CHECK (period IN ('weekly', 'monthly', 'quarterly', 'yearly'))
);
";
