//! Input rules shared by transactions and budgets.
//!
//! Bounds mirror the storage columns: categories are `VARCHAR(100)` and
//! money is `NUMERIC(19, 4)`.

use rust_decimal::Decimal;

use super::error::LedgerError;

/// Maximum category length in characters.
pub const MAX_CATEGORY_LEN: usize = 100;

/// Maximum number of fractional digits in an amount.
pub const MAX_AMOUNT_SCALE: u32 = 4;

/// Maximum number of integer digits in an amount.
pub const MAX_AMOUNT_INTEGER_DIGITS: u32 = 15;

pub(super) fn normalize_category(category: &str) -> Result<String, LedgerError> {
    let category = category.trim();
    if category.is_empty() {
        return Err(LedgerError::Validation("Category is required".to_string()));
    }
    if category.chars().count() > MAX_CATEGORY_LEN {
        return Err(LedgerError::Validation(format!(
            "Category must be at most {MAX_CATEGORY_LEN} characters"
        )));
    }
    Ok(category.to_string())
}

pub(super) fn check_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount);
    }
    if amount.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(LedgerError::Validation(format!(
            "Amount must have at most {MAX_AMOUNT_SCALE} decimal places"
        )));
    }
    if amount.trunc() >= Decimal::from(10_i64.pow(MAX_AMOUNT_INTEGER_DIGITS)) {
        return Err(LedgerError::Validation(format!(
            "Amount must have at most {MAX_AMOUNT_INTEGER_DIGITS} integer digits"
        )));
    }
    Ok(())
}
