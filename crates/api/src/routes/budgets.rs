//! Budget routes.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::{get, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use fintrack_core::ledger::{Budget, BudgetPeriod, CreateBudgetInput, UpdateBudgetInput};
use fintrack_shared::types::BudgetId;

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/{budget_id}", put(update_budget).delete(delete_budget))
}

/// Request body for creating or replacing a budget.
#[derive(Debug, Deserialize)]
pub struct BudgetRequest {
    /// Category, unique among the caller's budgets.
    pub category: String,
    /// Non-negative spending limit.
    pub limit: Decimal,
    /// `weekly`, `monthly`, `quarterly` or `yearly`.
    pub period: BudgetPeriod,
}

/// GET /budgets
async fn list_budgets(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Budget>>, ApiError> {
    Ok(Json(state.ledger.list_budgets(user_id).await?))
}

/// POST /budgets
async fn create_budget(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<BudgetRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Budget>), ApiError> {
    let Json(payload) = payload?;

    let budget = state
        .ledger
        .create_budget(user_id, CreateBudgetInput {
            category: payload.category,
            limit: payload.limit,
            period: payload.period,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(budget)))
}

/// PUT /budgets/{budget_id}
async fn update_budget(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    budget_id: Result<Path<BudgetId>, PathRejection>,
    payload: Result<Json<BudgetRequest>, JsonRejection>,
) -> Result<Json<Budget>, ApiError> {
    let Path(budget_id) = budget_id?;
    let Json(payload) = payload?;

    let budget = state
        .ledger
        .update_budget(user_id, budget_id, UpdateBudgetInput {
            category: payload.category,
            limit: payload.limit,
            period: payload.period,
        })
        .await?;

    Ok(Json(budget))
}

/// DELETE /budgets/{budget_id}
async fn delete_budget(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    budget_id: Result<Path<BudgetId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(budget_id) = budget_id?;

    state.ledger.delete_budget(budget_id, user_id).await?;
    info!(user_id = %user_id, budget_id = %budget_id, "Budget deleted");

    Ok(StatusCode::NO_CONTENT)
}
