//! Book entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A title in the library catalog.
///
/// `available_copies` is the inventory ledger: it always equals
/// `total_copies` minus the number of open checkouts for the book.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    /// Unique book identifier (natural key, e.g. `"BOOK1"`).
    pub book_id: String,
    /// Title.
    pub name: String,
    /// Author.
    pub author: String,
    /// Genre label used by the reports.
    pub genre: String,
    /// Copies owned by the library.
    pub total_copies: i32,
    /// Copies currently on the shelf.
    pub available_copies: i32,
}

impl Book {
    /// Number of copies currently on loan.
    pub fn copies_on_loan(&self) -> i32 {
        self.total_copies - self.available_copies
    }

    /// Check if at least one copy is on the shelf.
    pub fn has_available(&self) -> bool {
        self.available_copies > 0
    }
}

/// A catalog row joined with its live open-checkout count.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookSummary {
    /// Unique book identifier.
    pub book_id: String,
    /// Title.
    pub name: String,
    /// Author.
    pub author: String,
    /// Genre label.
    pub genre: String,
    /// Copies owned by the library.
    pub total_copies: i32,
    /// Copies currently on the shelf.
    pub available_copies: i32,
    /// Open checkouts for this book.
    pub open_checkouts: i64,
}

/// Data required to add a new book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBook {
    /// Desired book identifier.
    pub book_id: String,
    /// Title.
    pub name: String,
    /// Author.
    pub author: String,
    /// Genre label.
    pub genre: String,
    /// Initial number of copies (all start on the shelf).
    pub total_copies: i32,
}

/// Data for updating a book's descriptive fields.
///
/// Copy counts are deliberately absent: they only change through the
/// circulation ledger, one copy at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookDetails {
    /// New title.
    pub name: Option<String>,
    /// New author.
    pub author: Option<String>,
    /// New genre label.
    pub genre: Option<String>,
}
