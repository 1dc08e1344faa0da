//! Catalog browsing and maintenance services.

pub mod service;

pub use service::CatalogService;
