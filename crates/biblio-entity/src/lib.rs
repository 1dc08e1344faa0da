//! # biblio-entity
//!
//! Domain entity models for Biblio. Every struct in this crate represents
//! a database table row or a domain value object. All entities derive
//! `Debug`, `Clone`, `Serialize`, `Deserialize`, and database entities
//! additionally derive `sqlx::FromRow`.

pub mod activity;
pub mod book;
pub mod checkout;
pub mod report;
pub mod user;
