//! Checkout entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One lending event. A row with `return_date = NULL` is an open checkout
/// and accounts for exactly one copy missing from the shelf.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Checkout {
    /// Unique checkout identifier.
    pub id: Uuid,
    /// The borrowed book.
    pub book_id: String,
    /// The borrowing user.
    pub user_id: String,
    /// When the copy left the shelf.
    pub checkout_date: DateTime<Utc>,
    /// When the copy came back (`None` while on loan).
    pub return_date: Option<DateTime<Utc>>,
}

impl Checkout {
    /// Check if the copy is still out.
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}

/// A checkout joined with its book's descriptive fields, for history views.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CheckoutRecord {
    /// Unique checkout identifier.
    pub id: Uuid,
    /// The borrowed book.
    pub book_id: String,
    /// Book title.
    pub book_name: String,
    /// Book author.
    pub author: String,
    /// Book genre.
    pub genre: String,
    /// The borrowing user.
    pub user_id: String,
    /// When the copy left the shelf.
    pub checkout_date: DateTime<Utc>,
    /// When the copy came back (`None` while on loan).
    pub return_date: Option<DateTime<Utc>>,
}

/// Advisory pre-check for a checkout attempt.
///
/// The actual checkout re-verifies everything inside its transaction; this
/// summary only exists so clients can disable a button before trying.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutEligibility {
    /// Whether a checkout attempt would currently succeed.
    pub can_checkout: bool,
    /// The user's open checkouts right now.
    pub open_count: i64,
    /// Whether the user already has this book out.
    pub has_book: bool,
    /// Copies of this book on the shelf right now.
    pub available_copies: i32,
}

impl CheckoutEligibility {
    /// Combine the three lending rules into a single verdict.
    pub fn evaluate(open_count: i64, has_book: bool, available_copies: i32, limit: i64) -> Self {
        Self {
            can_checkout: open_count < limit && !has_book && available_copies > 0,
            open_count,
            has_book,
            available_copies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligible_under_all_rules() {
        let e = CheckoutEligibility::evaluate(2, false, 1, 5);
        assert!(e.can_checkout);
    }

    #[test]
    fn test_blocked_at_limit() {
        let e = CheckoutEligibility::evaluate(5, false, 3, 5);
        assert!(!e.can_checkout);
    }

    #[test]
    fn test_blocked_by_duplicate() {
        let e = CheckoutEligibility::evaluate(1, true, 3, 5);
        assert!(!e.can_checkout);
    }

    #[test]
    fn test_blocked_by_empty_shelf() {
        let e = CheckoutEligibility::evaluate(0, false, 0, 5);
        assert!(!e.can_checkout);
    }
}
