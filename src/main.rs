//! Biblio server entry point.
//!
//! Loads configuration, initializes logging, prepares the database, and
//! hands off to the API layer.

use tracing_subscriber::{EnvFilter, fmt};

use biblio_core::config::AppConfig;
use biblio_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load layered configuration for the selected environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("BIBLIO_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Biblio v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection ──────────────────────────────
    tracing::info!("Connecting to database...");
    let db = biblio_database::DatabasePool::connect(&config.database).await?;

    // ── Step 2: Migrations ───────────────────────────────────────
    tracing::info!("Running database migrations...");
    biblio_database::migration::run_migrations(db.pool()).await?;
    tracing::info!("Database migrations complete");

    // ── Step 3: Serve ────────────────────────────────────────────
    biblio_api::run_server(config, db.into_pool()).await
}
