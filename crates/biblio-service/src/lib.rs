//! # biblio-service
//!
//! Business logic service layer for Biblio. Each service orchestrates
//! repositories and authentication primitives to implement application-level
//! use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod auth;
pub mod catalog;
pub mod circulation;
pub mod context;
pub mod report;
pub mod user;

pub use auth::AuthService;
pub use catalog::CatalogService;
pub use circulation::CirculationService;
pub use context::RequestContext;
pub use report::ReportService;
pub use user::UserService;
