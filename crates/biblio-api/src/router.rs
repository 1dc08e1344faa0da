//! Route definitions for the Biblio HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`; the health
//! probe lives at the root. The router receives `AppState` and passes it to
//! all handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use biblio_core::config::app::CorsConfig;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(book_routes())
        .merge(checkout_routes())
        .merge(report_routes())
        .merge(admin_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(handlers::health::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Auth endpoints: signup, login, logout, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
}

/// Catalog browsing
fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/books", get(handlers::books::list_books))
        .route("/books/genres", get(handlers::books::list_genres))
        .route("/books/{book_id}", get(handlers::books::get_book))
}

/// Checkout and return workflows
fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/checkouts", get(handlers::checkouts::my_checkouts))
        .route("/checkouts", post(handlers::checkouts::checkout_book))
        .route("/checkouts/return", post(handlers::checkouts::return_books))
        .route(
            "/checkouts/eligibility/{book_id}",
            get(handlers::checkouts::eligibility),
        )
}

/// Member-facing reports
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/reports/genres", get(handlers::reports::genre_popularity))
        .route(
            "/reports/monthly-trends",
            get(handlers::reports::monthly_trends),
        )
        .route("/reports/me", get(handlers::reports::my_statistics))
}

/// Admin-only endpoints
fn admin_routes() -> Router<AppState> {
    Router::new()
        // Dashboard and reports
        .route("/admin/stats", get(handlers::admin::stats::dashboard))
        .route(
            "/admin/reports/daily",
            get(handlers::admin::stats::daily_report),
        )
        // Member directory
        .route("/admin/users", get(handlers::admin::users::list_users))
        .route(
            "/admin/users/{user_id}/history",
            get(handlers::admin::users::user_history),
        )
        .route(
            "/admin/users/{user_id}/last-activity",
            get(handlers::admin::users::last_activity),
        )
        // Inventory
        .route("/admin/books", post(handlers::admin::inventory::add_book))
        .route(
            "/admin/books/{book_id}",
            put(handlers::admin::inventory::update_book),
        )
        .route(
            "/admin/books/{book_id}/copies",
            put(handlers::admin::inventory::adjust_copies),
        )
        .route(
            "/admin/books/{book_id}",
            delete(handlers::admin::inventory::delete_book),
        )
}

/// Build CORS layer from configuration
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    use axum::http::{HeaderName, HeaderValue, Method};
    use tower_http::cors::Any;

    let mut cors = CorsLayer::new();

    if config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    if config.allowed_headers.iter().any(|h| h == "*") {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<HeaderName> = config
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors.max_age(std::time::Duration::from_secs(config.max_age_seconds))
}
