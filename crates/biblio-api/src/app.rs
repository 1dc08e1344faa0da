//! Server assembly: wires repositories, services, and the router, then
//! serves until a shutdown signal arrives.

use std::sync::Arc;

use sqlx::PgPool;

use biblio_auth::jwt::decoder::JwtDecoder;
use biblio_auth::jwt::encoder::JwtEncoder;
use biblio_auth::password::hasher::PasswordHasher;
use biblio_core::config::AppConfig;
use biblio_core::error::AppError;
use biblio_core::result::AppResult;
use biblio_database::repositories::activity::ActivityRepository;
use biblio_database::repositories::book::BookRepository;
use biblio_database::repositories::checkout::CheckoutRepository;
use biblio_database::repositories::user::UserRepository;
use biblio_service::auth::AuthService;
use biblio_service::catalog::CatalogService;
use biblio_service::circulation::CirculationService;
use biblio_service::report::ReportService;
use biblio_service::user::UserService;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the application state from a configuration and a live pool.
pub fn build_state(config: AppConfig, db_pool: PgPool) -> AppState {
    // ── Repositories ─────────────────────────────────────────────
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let book_repo = Arc::new(BookRepository::new(db_pool.clone()));
    let checkout_repo = Arc::new(CheckoutRepository::new(db_pool.clone()));
    let activity_repo = Arc::new(ActivityRepository::new(db_pool.clone()));

    // ── Auth primitives ──────────────────────────────────────────
    let password_hasher = Arc::new(PasswordHasher::new());
    let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    // ── Services ─────────────────────────────────────────────────
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repo),
        Arc::clone(&activity_repo),
        Arc::clone(&password_hasher),
        Arc::clone(&jwt_encoder),
        config.auth.clone(),
    ));
    let catalog_service = Arc::new(CatalogService::new(Arc::clone(&book_repo)));
    let circulation_service = Arc::new(CirculationService::new(
        db_pool.clone(),
        Arc::clone(&book_repo),
        Arc::clone(&checkout_repo),
        config.circulation.clone(),
    ));
    let report_service = Arc::new(ReportService::new(
        Arc::clone(&book_repo),
        Arc::clone(&checkout_repo),
        Arc::clone(&user_repo),
        Arc::clone(&activity_repo),
        config.circulation.clone(),
    ));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repo),
        Arc::clone(&checkout_repo),
        Arc::clone(&activity_repo),
    ));

    AppState {
        config: Arc::new(config),
        db_pool,
        jwt_decoder,
        auth_service,
        catalog_service,
        circulation_service,
        report_service,
        user_service,
    }
}

/// Runs the Biblio server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> AppResult<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = build_state(config, db_pool);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Biblio server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Completes when Ctrl+C or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
