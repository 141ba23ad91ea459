//! Transaction routes: record, list and balance.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use fintrack_core::ledger::{BalanceSummary, CreateTransactionInput, Transaction};

/// Creates the transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/transactions/balance", get(balance))
}

/// Request body for recording a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Non-negative amount.
    pub amount: Decimal,
    /// `income` or `expense`.
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// Date the money moved (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Category label.
    pub category: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// POST /transactions
async fn create_transaction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let Json(payload) = payload?;

    let transaction = state
        .ledger
        .record_transaction(user_id, CreateTransactionInput {
            amount: payload.amount,
            transaction_type: payload.transaction_type,
            date: payload.date,
            category: payload.category,
            description: payload.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// GET /transactions
async fn list_transactions(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    Ok(Json(state.ledger.list_transactions(user_id).await?))
}

/// GET /transactions/balance
async fn balance(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<BalanceSummary>, ApiError> {
    Ok(Json(state.ledger.balance_summary(user_id).await?))
}
