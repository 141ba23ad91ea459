//! Property-based tests for LedgerService.
//!
//! - Balance integrity: balance == sum(income) - sum(expense)
//! - Budget categories stay pairwise distinct per user

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use fintrack_shared::types::UserId;

use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{BudgetPeriod, CreateBudgetInput, CreateTransactionInput, TransactionType};
use crate::memory::{InMemoryBudgetStore, InMemoryTransactionStore};

/// Strategy to generate non-negative decimal amounts (0.00 to 10,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn transaction_type() -> impl Strategy<Value = TransactionType> {
    prop_oneof![Just(TransactionType::Income), Just(TransactionType::Expense)]
}

fn category() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("food".to_string()),
        Just("rent".to_string()),
        Just("travel".to_string()),
        Just("salary".to_string()),
    ]
}

fn ledger() -> LedgerService {
    LedgerService::new(
        Arc::new(InMemoryTransactionStore::new()),
        Arc::new(InMemoryBudgetStore::new()),
    )
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Balance equals income minus expense for any sequence of transactions.
    #[test]
    fn prop_balance_is_income_minus_expense(
        entries in prop::collection::vec((amount(), transaction_type()), 0..20),
    ) {
        let rt = runtime();
        let ledger = ledger();
        let user = UserId::new();
        let date = NaiveDate::from_ymd_opt(2026, 6, 1).expect("date");

        let (balance, income, expense) = rt.block_on(async {
            for (amount, kind) in &entries {
                ledger
                    .record_transaction(user, CreateTransactionInput {
                        amount: *amount,
                        transaction_type: kind.as_str().to_string(),
                        date,
                        category: "misc".to_string(),
                        description: None,
                    })
                    .await
                    .expect("record");
            }
            (
                ledger.total_balance(user).await.expect("balance"),
                ledger.total_income(user).await.expect("income"),
                ledger.total_expense(user).await.expect("expense"),
            )
        });

        let expected: Decimal = entries
            .iter()
            .map(|(amount, kind)| match kind {
                TransactionType::Income => *amount,
                TransactionType::Expense => -*amount,
            })
            .sum();

        prop_assert_eq!(balance, expected);
        prop_assert_eq!(balance, income - expense);
    }

    /// However creates are interleaved, a user never holds two budgets
    /// for the same category, and every rejection is a duplicate.
    #[test]
    fn prop_budget_categories_unique(categories in prop::collection::vec(category(), 1..12)) {
        let rt = runtime();
        let ledger = ledger();
        let user = UserId::new();

        let (listed, rejected) = rt.block_on(async {
            let mut rejected = 0usize;
            for category in &categories {
                let result = ledger
                    .create_budget(user, CreateBudgetInput {
                        category: category.clone(),
                        limit: Decimal::ONE_HUNDRED,
                        period: BudgetPeriod::Monthly,
                    })
                    .await;
                match result {
                    Ok(_) => {}
                    Err(LedgerError::DuplicateBudgetCategory(_)) => rejected += 1,
                    Err(other) => panic!("unexpected error: {other}"),
                }
            }
            (ledger.list_budgets(user).await.expect("list"), rejected)
        });

        let distinct: HashSet<&String> = categories.iter().collect();
        prop_assert_eq!(listed.len(), distinct.len());
        prop_assert_eq!(listed.len() + rejected, categories.len());
    }
}
