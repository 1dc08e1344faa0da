//! # biblio-database
//!
//! PostgreSQL database connection management and concrete repository
//! implementations for all Biblio entities.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod retry;

pub use connection::DatabasePool;
