//! Core business logic for Fintrack.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Storage is reached only through the capability traits in [`repository`].
//!
//! # Modules
//!
//! - `auth` - Password hashing and verification
//! - `repository` - Storage capability traits for users, transactions and budgets
//! - `directory` - User registration and credential checks
//! - `ledger` - Transactions, balances and per-category budgets
//! - `memory` - In-memory stores implementing the storage traits

pub mod auth;
pub mod directory;
pub mod ledger;
pub mod memory;
pub mod repository;
