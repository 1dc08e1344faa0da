//! Book repository implementation.
//!
//! Pool-based methods serve plain reads and standalone writes. Methods
//! taking `&mut PgConnection` are steps inside a circulation transaction;
//! callers own the transaction and the row lock.

use sqlx::postgres::PgConnection;
use sqlx::PgPool;

use biblio_core::error::AppError;
use biblio_core::result::AppResult;
use biblio_core::types::pagination::{PageRequest, PageResponse};
use biblio_entity::book::{Book, BookSummary, CreateBook, UpdateBookDetails};

use super::db_error;

/// Repository for catalog CRUD and query operations.
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    /// Create a new book repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a book by primary key.
    pub async fn find_by_id(&self, book_id: &str) -> AppResult<Option<Book>> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE book_id = $1")
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find book by id", e))
    }

    /// List catalog rows with live open-checkout counts, optionally filtered
    /// by a case-insensitive substring match on title, author, or genre.
    pub async fn summaries(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<BookSummary>> {
        let pattern = search
            .map(|s| format!("%{s}%"))
            .unwrap_or_else(|| "%".to_string());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM books \
             WHERE ($1::text IS NULL OR name ILIKE $2 OR author ILIKE $2 OR genre ILIKE $2)",
        )
        .bind(search)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count books", e))?;

        let books = sqlx::query_as::<_, BookSummary>(
            "SELECT b.book_id, b.name, b.author, b.genre, b.total_copies, b.available_copies, \
                    COUNT(c.id) FILTER (WHERE c.return_date IS NULL) AS open_checkouts \
             FROM books b \
             LEFT JOIN checkouts c ON c.book_id = b.book_id \
             WHERE ($1::text IS NULL \
                    OR b.name ILIKE $2 OR b.author ILIKE $2 OR b.genre ILIKE $2) \
             GROUP BY b.book_id \
             ORDER BY b.name ASC \
             LIMIT $3 OFFSET $4",
        )
        .bind(search)
        .bind(&pattern)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list books", e))?;

        Ok(PageResponse::new(
            books,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List distinct genres in the catalog.
    pub async fn genres(&self) -> AppResult<Vec<String>> {
        sqlx::query_scalar("SELECT DISTINCT genre FROM books ORDER BY genre ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list genres", e))
    }

    /// Add a new book. All copies start on the shelf.
    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "INSERT INTO books (book_id, name, author, genre, total_copies, available_copies) \
             VALUES ($1, $2, $3, $4, $5, $5) \
             RETURNING *",
        )
        .bind(&data.book_id)
        .bind(&data.name)
        .bind(&data.author)
        .bind(&data.genre)
        .bind(data.total_copies)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("books_pkey") => {
                AppError::conflict(format!("Book '{}' already exists", data.book_id))
            }
            _ => db_error("Failed to create book", e),
        })
    }

    /// Update a book's descriptive fields.
    pub async fn update_details(
        &self,
        book_id: &str,
        data: &UpdateBookDetails,
    ) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "UPDATE books SET name = COALESCE($2, name), \
                              author = COALESCE($3, author), \
                              genre = COALESCE($4, genre) \
             WHERE book_id = $1 RETURNING *",
        )
        .bind(book_id)
        .bind(&data.name)
        .bind(&data.author)
        .bind(&data.genre)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update book", e))?
        .ok_or_else(|| AppError::not_found(format!("Book {book_id} not found")))
    }

    /// Count all books in the catalog.
    pub async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count books", e))
    }

    /// Sum owned copies and copies currently on loan across the catalog.
    pub async fn copy_totals(&self) -> AppResult<(i64, i64)> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT COALESCE(SUM(total_copies), 0), \
                    COALESCE(SUM(total_copies - available_copies), 0) \
             FROM books",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to sum copy totals", e))
    }

    /// Lock a book row for the rest of the transaction and return it.
    ///
    /// Concurrent circulation mutations on the same book queue behind
    /// this lock, so every precondition read after it is current.
    pub async fn find_for_update(
        &self,
        conn: &mut PgConnection,
        book_id: &str,
    ) -> AppResult<Option<Book>> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE book_id = $1 FOR UPDATE")
            .bind(book_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| db_error("Failed to lock book row", e))
    }

    /// Shift `available_copies` by `delta` within a transaction.
    pub async fn adjust_available(
        &self,
        conn: &mut PgConnection,
        book_id: &str,
        delta: i32,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE books SET available_copies = available_copies + $2 WHERE book_id = $1",
        )
        .bind(book_id)
        .bind(delta)
        .execute(&mut *conn)
        .await
        .map_err(|e| db_error("Failed to adjust available copies", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Book {book_id} not found")));
        }
        Ok(())
    }

    /// Shift both copy counters by `delta` within a transaction.
    pub async fn adjust_copies(
        &self,
        conn: &mut PgConnection,
        book_id: &str,
        delta: i32,
    ) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "UPDATE books SET total_copies = total_copies + $2, \
                              available_copies = available_copies + $2 \
             WHERE book_id = $1 RETURNING *",
        )
        .bind(book_id)
        .bind(delta)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| db_error("Failed to adjust copy counts", e))?
        .ok_or_else(|| AppError::not_found(format!("Book {book_id} not found")))
    }

    /// Delete a book row within a transaction.
    pub async fn delete(&self, conn: &mut PgConnection, book_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| db_error("Failed to delete book", e))?;

        Ok(result.rows_affected() > 0)
    }
}
