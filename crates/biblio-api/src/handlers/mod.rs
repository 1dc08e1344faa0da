//! Route handlers organized by domain.

pub mod admin;
pub mod auth;
pub mod books;
pub mod checkouts;
pub mod health;
pub mod reports;
