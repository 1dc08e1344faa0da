//! User repository implementation.

use sqlx::PgPool;

use biblio_core::error::AppError;
use biblio_core::result::AppResult;
use biblio_core::types::pagination::{PageRequest, PageResponse};
use biblio_entity::user::{CreateUser, User};

use super::db_error;

/// Repository for user CRUD and query operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, user_id: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find user by id", e))
    }

    /// Create a new user.
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (user_id, name, user_type, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(&data.user_id)
        .bind(&data.name)
        .bind(data.user_type)
        .bind(&data.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_pkey") => {
                AppError::conflict(format!("User '{}' already exists", data.user_id))
            }
            _ => db_error("Failed to create user", e),
        })
    }

    /// List users with pagination, optionally filtered by a substring match
    /// on user id or display name.
    pub async fn find_all(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        let pattern = search
            .map(|s| format!("%{s}%"))
            .unwrap_or_else(|| "%".to_string());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users \
             WHERE ($1::text IS NULL OR user_id ILIKE $2 OR name ILIKE $2)",
        )
        .bind(search)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count users", e))?;

        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users \
             WHERE ($1::text IS NULL OR user_id ILIKE $2 OR name ILIKE $2) \
             ORDER BY created_at DESC \
             LIMIT $3 OFFSET $4",
        )
        .bind(search)
        .bind(&pattern)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list users", e))?;

        Ok(PageResponse::new(
            users,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Count all registered users.
    pub async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count users", e))
    }
}
