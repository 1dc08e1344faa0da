//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use biblio_auth::jwt::decoder::JwtDecoder;
use biblio_core::config::AppConfig;
use biblio_service::auth::AuthService;
use biblio_service::catalog::CatalogService;
use biblio_service::circulation::CirculationService;
use biblio_service::report::ReportService;
use biblio_service::user::UserService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Account registration and login
    pub auth_service: Arc<AuthService>,
    /// Catalog browsing and maintenance
    pub catalog_service: Arc<CatalogService>,
    /// Checkout and check-in workflows
    pub circulation_service: Arc<CirculationService>,
    /// Aggregate reporting
    pub report_service: Arc<ReportService>,
    /// Member directory for admins
    pub user_service: Arc<UserService>,
}
