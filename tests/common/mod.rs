//! Shared test helpers for integration tests.
//!
//! Tests run against a real PostgreSQL database named by
//! `BIBLIO_TEST_DATABASE_URL`. When the variable is unset every test
//! returns early so the suite still passes on machines without a database.
//!
//! Tests share one database and never truncate it; anything a test creates
//! uses [`unique_id`] so concurrent tests cannot collide.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use biblio_core::config::app::{CorsConfig, ServerConfig};
use biblio_core::config::auth::AuthConfig;
use biblio_core::config::circulation::CirculationConfig;
use biblio_core::config::logging::LoggingConfig;
use biblio_core::config::{AppConfig, DatabaseConfig};

/// Admin signup code configured for the test app.
pub const TEST_ADMIN_CODE: &str = "LIBRARIAN";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct assertions
    pub db_pool: PgPool,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` payload of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

/// A unique identifier with the given prefix, safe for parallel tests.
pub fn unique_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

impl TestApp {
    /// Create a new test application, or `None` when no database is
    /// configured.
    pub async fn new() -> Option<Self> {
        Self::with_config(|_| {}).await
    }

    /// Create a test application with the configuration adjusted.
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Option<Self> {
        let Ok(url) = std::env::var("BIBLIO_TEST_DATABASE_URL") else {
            eprintln!("BIBLIO_TEST_DATABASE_URL not set; skipping integration test");
            return None;
        };

        let mut config = test_config(url);
        adjust(&mut config);

        let db = biblio_database::DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");

        biblio_database::migration::run_migrations(db.pool())
            .await
            .expect("Failed to run migrations");

        let db_pool = db.into_pool();
        let state = biblio_api::app::build_state(config, db_pool.clone());
        let router = biblio_api::build_router(state);

        Some(Self { router, db_pool })
    }

    /// Register a member through the API and return their user ID.
    pub async fn signup_member(&self, prefix: &str) -> String {
        let user_id = unique_id(prefix);
        let response = self
            .request(
                "POST",
                "/api/auth/signup",
                Some(serde_json::json!({
                    "user_id": user_id,
                    "name": "Test Member",
                    "password": "password123",
                })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Signup failed: {:?}",
            response.body
        );
        user_id
    }

    /// Register an admin through the API and return their user ID.
    pub async fn signup_admin(&self, prefix: &str) -> String {
        let user_id = unique_id(prefix);
        let response = self
            .request(
                "POST",
                "/api/auth/signup",
                Some(serde_json::json!({
                    "user_id": user_id,
                    "name": "Test Librarian",
                    "password": "password123",
                    "user_type": "admin",
                    "admin_code": TEST_ADMIN_CODE,
                })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Admin signup failed: {:?}",
            response.body
        );
        user_id
    }

    /// Login and return the JWT access token
    pub async fn login(&self, user_id: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({
                    "user_id": user_id,
                    "password": password,
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"]["token"]
            .as_str()
            .expect("No token in login response")
            .to_string()
    }

    /// Add a book through the admin API and return its book ID.
    pub async fn add_book(&self, admin_token: &str, genre: &str, copies: i32) -> String {
        let book_id = unique_id("book");
        let response = self
            .request(
                "POST",
                "/api/admin/books",
                Some(serde_json::json!({
                    "book_id": book_id,
                    "name": format!("Title {book_id}"),
                    "author": "Some Author",
                    "genre": genre,
                    "total_copies": copies,
                })),
                Some(admin_token),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Add book failed: {:?}",
            response.body
        );
        book_id
    }

    /// Available and total copies of a book, read straight from the table.
    pub async fn copies(&self, book_id: &str) -> (i32, i32) {
        sqlx::query_as(
            "SELECT available_copies, total_copies FROM books WHERE book_id = $1",
        )
        .bind(book_id)
        .fetch_one(&self.db_pool)
        .await
        .expect("Book not found")
    }

    /// Open checkout rows for a book.
    pub async fn open_checkout_count(&self, book_id: &str) -> i64 {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM checkouts WHERE book_id = $1 AND return_date IS NULL",
        )
        .bind(book_id)
        .fetch_one(&self.db_pool)
        .await
        .expect("Count query failed")
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

fn test_config(database_url: String) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            body_limit_bytes: 1024 * 1024,
            cors: CorsConfig::default(),
        },
        database: DatabaseConfig {
            url: database_url,
            max_connections: 10,
            min_connections: 1,
            connect_timeout_seconds: 5,
            idle_timeout_seconds: 60,
        },
        auth: AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            jwt_ttl_minutes: 60,
            password_min_length: 8,
            admin_signup_code: TEST_ADMIN_CODE.to_string(),
        },
        circulation: CirculationConfig::default(),
        logging: LoggingConfig::default(),
    }
}
