//! Catalog browsing and book maintenance.

use std::sync::Arc;

use tracing::info;

use biblio_core::error::AppError;
use biblio_core::result::AppResult;
use biblio_core::types::pagination::{PageRequest, PageResponse};
use biblio_database::repositories::book::BookRepository;
use biblio_database::retry::retry_read;
use biblio_entity::book::{Book, BookSummary, CreateBook, UpdateBookDetails};

use crate::context::RequestContext;

/// Handles catalog listing, lookup, and descriptive edits.
///
/// Copy counts never change here; those belong to the circulation ledger.
#[derive(Debug, Clone)]
pub struct CatalogService {
    /// Book repository.
    book_repo: Arc<BookRepository>,
}

impl CatalogService {
    /// Creates a new catalog service.
    pub fn new(book_repo: Arc<BookRepository>) -> Self {
        Self { book_repo }
    }

    /// Lists catalog rows with open-checkout counts, ordered by title.
    pub async fn list_books(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> AppResult<PageResponse<BookSummary>> {
        let search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        retry_read(|| self.book_repo.summaries(search.as_deref(), &page)).await
    }

    /// Fetches one book by ID.
    pub async fn get_book(&self, book_id: &str) -> AppResult<Book> {
        retry_read(|| self.book_repo.find_by_id(book_id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Book {book_id} not found")))
    }

    /// Lists the distinct genres present in the catalog.
    pub async fn genres(&self) -> AppResult<Vec<String>> {
        retry_read(|| self.book_repo.genres()).await
    }

    /// Adds a new book. All copies start on the shelf.
    pub async fn add_book(&self, ctx: &RequestContext, data: CreateBook) -> AppResult<Book> {
        if data.book_id.trim().is_empty() {
            return Err(AppError::validation("Book ID is required"));
        }
        if data.name.trim().is_empty() {
            return Err(AppError::validation("Book name is required"));
        }
        if data.author.trim().is_empty() {
            return Err(AppError::validation("Author is required"));
        }
        if data.genre.trim().is_empty() {
            return Err(AppError::validation("Genre is required"));
        }
        if data.total_copies < 1 {
            return Err(AppError::validation("A book needs at least one copy"));
        }

        let book = self
            .book_repo
            .create(&CreateBook {
                book_id: data.book_id.trim().to_string(),
                name: data.name.trim().to_string(),
                author: data.author.trim().to_string(),
                genre: data.genre.trim().to_string(),
                total_copies: data.total_copies,
            })
            .await?;

        info!(admin = %ctx.user_id, book_id = %book.book_id, "Book added to catalog");
        Ok(book)
    }

    /// Updates a book's descriptive fields.
    pub async fn update_details(
        &self,
        ctx: &RequestContext,
        book_id: &str,
        data: UpdateBookDetails,
    ) -> AppResult<Book> {
        for field in [&data.name, &data.author, &data.genre] {
            if let Some(value) = field {
                if value.trim().is_empty() {
                    return Err(AppError::validation("Updated fields cannot be empty"));
                }
            }
        }

        let book = self.book_repo.update_details(book_id, &data).await?;

        info!(admin = %ctx.user_id, book_id = %book.book_id, "Book details updated");
        Ok(book)
    }
}
