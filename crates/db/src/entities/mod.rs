//! `SeaORM` entity definitions.

pub mod budgets;
pub mod transactions;
pub mod users;
