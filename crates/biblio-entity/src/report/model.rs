//! Aggregate query projections used by the reporting services.
//!
//! These are not table rows; each struct maps one GROUP BY result shape.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Checkout count for a single genre.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GenreCount {
    /// Genre label.
    pub genre: String,
    /// Number of checkouts ever recorded for the genre.
    pub checkout_count: i64,
}

/// Checkout count for one month and genre.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MonthlyGenreCount {
    /// Month key, formatted `YYYY-MM`.
    pub month: String,
    /// Genre label.
    pub genre: String,
    /// Checkouts of the genre during the month.
    pub checkout_count: i64,
}

/// A heavily borrowed title.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PopularBook {
    /// Unique book identifier.
    pub book_id: String,
    /// Title.
    pub name: String,
    /// Copies of this book currently out.
    pub open_checkouts: i64,
}

/// Checkouts recorded on a single day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyCheckoutCount {
    /// Calendar day (UTC).
    pub day: NaiveDate,
    /// Checkouts recorded that day.
    pub checkout_count: i64,
}
