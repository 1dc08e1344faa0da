//! Core type definitions used across the Biblio workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
