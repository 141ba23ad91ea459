//! Fintrack API Server
//!
//! Main entry point for the Fintrack backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use fintrack_api::{AppState, create_router};
use fintrack_db::{BudgetRepository, TransactionRepository, UserRepository, connect};
use fintrack_shared::{AppConfig, JwtService};

/// Installs the global subscriber. `LOG_FORMAT=json` selects JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fintrack=debug,tower_http=debug".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // An empty signing secret is fatal
    let jwt_service =
        JwtService::new(config.jwt_config()).context("Failed to initialize token service")?;

    let db = connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let state = AppState::new(
        Arc::new(jwt_service),
        Arc::new(UserRepository::new(db.clone())),
        Arc::new(TransactionRepository::new(db.clone())),
        Arc::new(BudgetRepository::new(db)),
    );

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
