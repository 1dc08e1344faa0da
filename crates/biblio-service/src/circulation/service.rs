//! The circulation ledger: checkout, check-in, copy adjustments, deletion.
//!
//! Every mutation runs in a single transaction that first locks the book
//! row with `SELECT ... FOR UPDATE`. Concurrent mutators on the same book
//! serialize behind that lock, so precondition reads are always current
//! and a race for the last copy ends with exactly one winner. An early
//! error return drops the transaction, which rolls it back.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use biblio_core::config::circulation::CirculationConfig;
use biblio_core::error::{AppError, ErrorKind};
use biblio_core::result::AppResult;
use biblio_database::repositories::book::BookRepository;
use biblio_database::repositories::checkout::CheckoutRepository;
use biblio_database::retry::retry_read;
use biblio_entity::book::Book;
use biblio_entity::checkout::{Checkout, CheckoutEligibility, CheckoutRecord};

use crate::context::RequestContext;

/// Owns every mutation of the inventory ledger.
#[derive(Debug, Clone)]
pub struct CirculationService {
    /// Pool for opening transactions.
    pool: PgPool,
    /// Book repository.
    book_repo: Arc<BookRepository>,
    /// Checkout repository.
    checkout_repo: Arc<CheckoutRepository>,
    /// Lending rules.
    config: CirculationConfig,
}

impl CirculationService {
    /// Creates a new circulation service.
    pub fn new(
        pool: PgPool,
        book_repo: Arc<BookRepository>,
        checkout_repo: Arc<CheckoutRepository>,
        config: CirculationConfig,
    ) -> Self {
        Self {
            pool,
            book_repo,
            checkout_repo,
            config,
        }
    }

    /// Checks a book out to the calling user.
    ///
    /// Preconditions, re-verified under the row lock: the book exists, a
    /// copy is on the shelf, the user does not already have this book out,
    /// and the user is under the open-checkout limit.
    pub async fn checkout(&self, ctx: &RequestContext, book_id: &str) -> AppResult<Checkout> {
        let mut tx = self.pool.begin().await.map_err(begin_error)?;

        let book = self
            .book_repo
            .find_for_update(&mut tx, book_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Book {book_id} not found")))?;

        if book.available_copies <= 0 {
            return Err(AppError::conflict("No copies available"));
        }
        if self
            .checkout_repo
            .exists_open(&mut *tx, book_id, &ctx.user_id)
            .await?
        {
            return Err(AppError::conflict("Book already checked out by this user"));
        }
        let open_count = self
            .checkout_repo
            .count_open_by_user(&mut *tx, &ctx.user_id)
            .await?;
        if open_count >= self.config.max_open_checkouts {
            return Err(AppError::conflict("Checkout limit reached"));
        }

        let checkout = self
            .checkout_repo
            .insert(&mut tx, book_id, &ctx.user_id)
            .await?;
        self.book_repo.adjust_available(&mut tx, book_id, -1).await?;

        tx.commit().await.map_err(commit_error)?;

        info!(user_id = %ctx.user_id, book_id = %book_id, "Book checked out");
        Ok(checkout)
    }

    /// Returns a book for the calling user.
    pub async fn checkin(&self, ctx: &RequestContext, book_id: &str) -> AppResult<Checkout> {
        let mut tx = self.pool.begin().await.map_err(begin_error)?;

        self.book_repo
            .find_for_update(&mut tx, book_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Book {book_id} not found")))?;

        let closed = self
            .checkout_repo
            .close_open(&mut tx, book_id, &ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("No active checkout found"))?;

        self.book_repo.adjust_available(&mut tx, book_id, 1).await?;

        tx.commit().await.map_err(commit_error)?;

        info!(user_id = %ctx.user_id, book_id = %book_id, "Book checked in");
        Ok(closed)
    }

    /// Returns several books at once, all-or-nothing.
    ///
    /// Any book that does not exist or is not out to the caller aborts the
    /// whole batch; no copies move.
    pub async fn checkin_many(
        &self,
        ctx: &RequestContext,
        book_ids: &[String],
    ) -> AppResult<Vec<Checkout>> {
        if book_ids.is_empty() {
            return Err(AppError::validation("At least one book ID is required"));
        }

        // Lock in sorted order so concurrent batches cannot deadlock.
        let mut ids: Vec<&str> = book_ids.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids.dedup();

        let mut tx = self.pool.begin().await.map_err(begin_error)?;
        let mut closed = Vec::with_capacity(ids.len());

        for book_id in ids {
            self.book_repo
                .find_for_update(&mut tx, book_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Book {book_id} not found")))?;

            let checkout = self
                .checkout_repo
                .close_open(&mut tx, book_id, &ctx.user_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("No active checkout found for book {book_id}"))
                })?;

            self.book_repo.adjust_available(&mut tx, book_id, 1).await?;
            closed.push(checkout);
        }

        tx.commit().await.map_err(commit_error)?;

        info!(user_id = %ctx.user_id, count = closed.len(), "Batch check-in completed");
        Ok(closed)
    }

    /// Adds or retires one copy of a book.
    ///
    /// Retiring requires a copy on the shelf; a copy out on loan cannot be
    /// removed. The last copy can never be retired.
    pub async fn adjust_copies(
        &self,
        ctx: &RequestContext,
        book_id: &str,
        increment: bool,
    ) -> AppResult<Book> {
        let mut tx = self.pool.begin().await.map_err(begin_error)?;

        let book = self
            .book_repo
            .find_for_update(&mut tx, book_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Book {book_id} not found")))?;

        if !increment {
            if book.available_copies == 0 {
                return Err(AppError::conflict("No available copies to remove"));
            }
            if book.total_copies <= 1 {
                return Err(AppError::conflict("A book must keep at least one copy"));
            }
        }

        let delta = if increment { 1 } else { -1 };
        let updated = self.book_repo.adjust_copies(&mut tx, book_id, delta).await?;

        tx.commit().await.map_err(commit_error)?;

        info!(
            admin = %ctx.user_id,
            book_id = %book_id,
            total_copies = updated.total_copies,
            "Copy count adjusted"
        );
        Ok(updated)
    }

    /// Removes a book and its returned history from the catalog.
    ///
    /// Blocked while any copy is still out.
    pub async fn delete_book(&self, ctx: &RequestContext, book_id: &str) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(begin_error)?;

        self.book_repo
            .find_for_update(&mut tx, book_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Book {book_id} not found")))?;

        let open = self
            .checkout_repo
            .count_open_by_book(&mut *tx, book_id)
            .await?;
        if open > 0 {
            return Err(AppError::conflict("Cannot delete book with active checkouts"));
        }

        self.checkout_repo.delete_by_book(&mut tx, book_id).await?;
        self.book_repo.delete(&mut tx, book_id).await?;

        tx.commit().await.map_err(commit_error)?;

        info!(admin = %ctx.user_id, book_id = %book_id, "Book deleted");
        Ok(())
    }

    /// Advisory pre-check: would a checkout of this book succeed right now?
    pub async fn eligibility(
        &self,
        ctx: &RequestContext,
        book_id: &str,
    ) -> AppResult<CheckoutEligibility> {
        retry_read(|| self.compute_eligibility(ctx, book_id)).await
    }

    async fn compute_eligibility(
        &self,
        ctx: &RequestContext,
        book_id: &str,
    ) -> AppResult<CheckoutEligibility> {
        let book = self
            .book_repo
            .find_by_id(book_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Book {book_id} not found")))?;

        let open_count = self
            .checkout_repo
            .count_open_by_user(&self.pool, &ctx.user_id)
            .await?;
        let has_book = self
            .checkout_repo
            .exists_open(&self.pool, book_id, &ctx.user_id)
            .await?;

        Ok(CheckoutEligibility::evaluate(
            open_count,
            has_book,
            book.available_copies,
            self.config.max_open_checkouts,
        ))
    }

    /// Lists the calling user's open checkouts with book details.
    pub async fn open_checkouts(&self, ctx: &RequestContext) -> AppResult<Vec<CheckoutRecord>> {
        retry_read(|| self.checkout_repo.open_by_user(&ctx.user_id)).await
    }
}

fn begin_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::PoolTimedOut => AppError::with_source(
            ErrorKind::ServiceUnavailable,
            "Failed to begin transaction: connection pool exhausted",
            e,
        ),
        _ => AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e),
    }
}

fn commit_error(e: sqlx::Error) -> AppError {
    AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
}
