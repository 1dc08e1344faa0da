//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Signup request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    /// Desired user identifier.
    #[validate(length(min = 1, max = 50, message = "User ID is required"))]
    pub user_id: String,
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    /// Plaintext password. Minimum length is enforced by auth policy.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Requested role: "user" (default) or "admin".
    pub user_type: Option<String>,
    /// Required when requesting the admin role.
    pub admin_code: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// User identifier.
    #[validate(length(min = 1, message = "User ID is required"))]
    pub user_id: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Checkout request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckoutRequest {
    /// The book to borrow.
    #[validate(length(min = 1, message = "Book ID is required"))]
    pub book_id: String,
}

/// Return request body. Accepts a single book or a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnRequest {
    /// Single book to return.
    pub book_id: Option<String>,
    /// Batch of books to return atomically.
    pub book_ids: Option<Vec<String>>,
}

/// Create book request (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookRequest {
    /// Catalog identifier, e.g. an ISBN.
    #[validate(length(min = 1, max = 50, message = "Book ID is required"))]
    pub book_id: String,
    /// Title.
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    /// Author.
    #[validate(length(min = 1, max = 255, message = "Author is required"))]
    pub author: String,
    /// Genre.
    #[validate(length(min = 1, max = 100, message = "Genre is required"))]
    pub genre: String,
    /// Initial copy count.
    #[validate(range(min = 1, message = "A book needs at least one copy"))]
    pub total_copies: i32,
}

/// Update book details request (admin). Only provided fields change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookRequest {
    /// New title.
    pub name: Option<String>,
    /// New author.
    pub author: Option<String>,
    /// New genre.
    pub genre: Option<String>,
}

/// Copy adjustment request (admin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustCopiesRequest {
    /// `true` adds one copy, `false` retires one.
    pub increment: bool,
}

/// Free-text search filter for list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Case-insensitive substring match.
    pub search: Option<String>,
}
