//! Checkout ledger repository implementation.
//!
//! The dual-use precondition queries take `impl PgExecutor` so the same
//! SQL serves advisory pool reads and the authoritative re-checks made
//! under a book row lock. Methods taking `&mut PgConnection` only run
//! inside a circulation transaction.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgConnection;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use biblio_core::result::AppResult;
use biblio_entity::checkout::{Checkout, CheckoutRecord};
use biblio_entity::report::{DailyCheckoutCount, GenreCount, MonthlyGenreCount, PopularBook};

use super::db_error;

/// Repository for the checkout ledger and its aggregates.
#[derive(Debug, Clone)]
pub struct CheckoutRepository {
    pool: PgPool,
}

impl CheckoutRepository {
    /// Create a new checkout repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Count a user's open checkouts.
    pub async fn count_open_by_user(
        &self,
        executor: impl PgExecutor<'_>,
        user_id: &str,
    ) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM checkouts WHERE user_id = $1 AND return_date IS NULL",
        )
        .bind(user_id)
        .fetch_one(executor)
        .await
        .map_err(|e| db_error("Failed to count open checkouts for user", e))
    }

    /// Check whether a user already has an open checkout for a book.
    pub async fn exists_open(
        &self,
        executor: impl PgExecutor<'_>,
        book_id: &str,
        user_id: &str,
    ) -> AppResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS( \
                 SELECT 1 FROM checkouts \
                 WHERE book_id = $1 AND user_id = $2 AND return_date IS NULL)",
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_one(executor)
        .await
        .map_err(|e| db_error("Failed to check for open checkout", e))
    }

    /// Count open checkouts for one book.
    pub async fn count_open_by_book(
        &self,
        executor: impl PgExecutor<'_>,
        book_id: &str,
    ) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM checkouts WHERE book_id = $1 AND return_date IS NULL",
        )
        .bind(book_id)
        .fetch_one(executor)
        .await
        .map_err(|e| db_error("Failed to count open checkouts for book", e))
    }

    /// Insert a new open checkout within a transaction.
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        book_id: &str,
        user_id: &str,
    ) -> AppResult<Checkout> {
        sqlx::query_as::<_, Checkout>(
            "INSERT INTO checkouts (id, book_id, user_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(book_id)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| db_error("Failed to insert checkout", e))
    }

    /// Close a user's open checkout for a book within a transaction.
    ///
    /// Returns `None` when the user has nothing out for this book. At most
    /// one row can match; the ledger allows a single open checkout per
    /// (book, user) pair.
    pub async fn close_open(
        &self,
        conn: &mut PgConnection,
        book_id: &str,
        user_id: &str,
    ) -> AppResult<Option<Checkout>> {
        sqlx::query_as::<_, Checkout>(
            "UPDATE checkouts SET return_date = NOW() \
             WHERE book_id = $1 AND user_id = $2 AND return_date IS NULL \
             RETURNING *",
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| db_error("Failed to close checkout", e))
    }

    /// Remove a book's entire checkout history within a transaction.
    pub async fn delete_by_book(&self, conn: &mut PgConnection, book_id: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM checkouts WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| db_error("Failed to delete checkout history", e))?;

        Ok(result.rows_affected())
    }

    /// List a user's open checkouts with book details, newest first.
    pub async fn open_by_user(&self, user_id: &str) -> AppResult<Vec<CheckoutRecord>> {
        sqlx::query_as::<_, CheckoutRecord>(
            "SELECT c.id, c.book_id, b.name AS book_name, b.author, b.genre, \
                    c.user_id, c.checkout_date, c.return_date \
             FROM checkouts c \
             JOIN books b ON b.book_id = c.book_id \
             WHERE c.user_id = $1 AND c.return_date IS NULL \
             ORDER BY c.checkout_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list open checkouts", e))
    }

    /// List a user's full checkout history, open items first.
    pub async fn history_by_user(&self, user_id: &str) -> AppResult<Vec<CheckoutRecord>> {
        sqlx::query_as::<_, CheckoutRecord>(
            "SELECT c.id, c.book_id, b.name AS book_name, b.author, b.genre, \
                    c.user_id, c.checkout_date, c.return_date \
             FROM checkouts c \
             JOIN books b ON b.book_id = c.book_id \
             WHERE c.user_id = $1 \
             ORDER BY (c.return_date IS NULL) DESC, c.checkout_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list checkout history", e))
    }

    /// Checkout counts per genre across the whole catalog, most borrowed
    /// first. Genres with no checkouts appear with a zero count.
    pub async fn genre_counts(&self) -> AppResult<Vec<GenreCount>> {
        sqlx::query_as::<_, GenreCount>(
            "SELECT b.genre, COUNT(c.id) AS checkout_count \
             FROM books b \
             LEFT JOIN checkouts c ON c.book_id = b.book_id \
             GROUP BY b.genre \
             ORDER BY checkout_count DESC, b.genre ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to aggregate genre counts", e))
    }

    /// One user's checkout counts per genre, most borrowed first.
    pub async fn genre_counts_for_user(&self, user_id: &str) -> AppResult<Vec<GenreCount>> {
        sqlx::query_as::<_, GenreCount>(
            "SELECT b.genre, COUNT(*) AS checkout_count \
             FROM checkouts c \
             JOIN books b ON b.book_id = c.book_id \
             WHERE c.user_id = $1 \
             GROUP BY b.genre \
             ORDER BY checkout_count DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to aggregate user genre counts", e))
    }

    /// Checkout counts grouped by month and genre since `since`.
    pub async fn monthly_counts(&self, since: DateTime<Utc>) -> AppResult<Vec<MonthlyGenreCount>> {
        sqlx::query_as::<_, MonthlyGenreCount>(
            "SELECT to_char(c.checkout_date AT TIME ZONE 'UTC', 'YYYY-MM') AS month, \
                    b.genre, COUNT(*) AS checkout_count \
             FROM checkouts c \
             JOIN books b ON b.book_id = c.book_id \
             WHERE c.checkout_date >= $1 \
             GROUP BY month, b.genre \
             ORDER BY month ASC, checkout_count DESC",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to aggregate monthly counts", e))
    }

    /// A user's lifetime and currently-open checkout counts.
    pub async fn user_totals(&self, user_id: &str) -> AppResult<(i64, i64)> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE return_date IS NULL) \
             FROM checkouts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count user checkouts", e))
    }

    /// A user's first and most recent checkout instants at or after `since`,
    /// or `None` when the window holds no checkouts.
    pub async fn checkout_span(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> AppResult<Option<(DateTime<Utc>, DateTime<Utc>)>> {
        let (first, last): (Option<DateTime<Utc>>, Option<DateTime<Utc>>) = sqlx::query_as(
            "SELECT MIN(checkout_date), MAX(checkout_date) \
             FROM checkouts WHERE user_id = $1 AND checkout_date >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find checkout span", e))?;

        Ok(first.zip(last))
    }

    /// Count checkouts recorded at or after `since`.
    pub async fn count_checkouts_since(&self, since: DateTime<Utc>) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM checkouts WHERE checkout_date >= $1")
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count recent checkouts", e))
    }

    /// Count check-ins recorded at or after `since`.
    pub async fn count_checkins_since(&self, since: DateTime<Utc>) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM checkouts WHERE return_date >= $1")
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count recent check-ins", e))
    }

    /// Count distinct users who checked something out at or after `since`.
    pub async fn distinct_borrowers_since(&self, since: DateTime<Utc>) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(DISTINCT user_id) FROM checkouts WHERE checkout_date >= $1")
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count distinct borrowers", e))
    }

    /// Per-day checkout counts at or after `since`.
    pub async fn daily_counts_since(
        &self,
        since: DateTime<Utc>,
    ) -> AppResult<Vec<DailyCheckoutCount>> {
        sqlx::query_as::<_, DailyCheckoutCount>(
            "SELECT (c.checkout_date AT TIME ZONE 'UTC')::date AS day, \
                    COUNT(*) AS checkout_count \
             FROM checkouts c \
             WHERE c.checkout_date >= $1 \
             GROUP BY day \
             ORDER BY day ASC",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to aggregate daily counts", e))
    }

    /// The most-borrowed titles ranked by copies currently out.
    pub async fn top_books(&self, limit: i64) -> AppResult<Vec<PopularBook>> {
        sqlx::query_as::<_, PopularBook>(
            "SELECT b.book_id, b.name, \
                    COUNT(c.id) FILTER (WHERE c.return_date IS NULL) AS open_checkouts \
             FROM books b \
             LEFT JOIN checkouts c ON c.book_id = b.book_id \
             GROUP BY b.book_id \
             ORDER BY open_checkouts DESC, b.name ASC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to rank popular books", e))
    }
}
