//! Repository implementations for all Biblio entities.

pub mod activity;
pub mod book;
pub mod checkout;
pub mod user;

pub use activity::ActivityRepository;
pub use book::BookRepository;
pub use checkout::CheckoutRepository;
pub use user::UserRepository;

use biblio_core::error::{AppError, ErrorKind};

/// Map a sqlx error to an [`AppError`], distinguishing pool exhaustion
/// (retryable, 503) from other database failures (500).
pub(crate) fn db_error(context: &str, e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::PoolTimedOut => AppError::with_source(
            ErrorKind::ServiceUnavailable,
            format!("{context}: connection pool exhausted"),
            e,
        ),
        _ => AppError::with_source(ErrorKind::Database, context.to_string(), e),
    }
}
