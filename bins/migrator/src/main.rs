//! Database migration runner for Fintrack.
//!
//! Reads `DATABASE_URL` (or `--database-url`). Usage:
//!   migrator up      - Apply all pending migrations
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-apply every migration

use fintrack_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The CLI installs its own tracing subscriber
    cli::run_cli(Migrator).await;
}
