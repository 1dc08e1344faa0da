//! User activity ledger entities.

pub mod model;

pub use model::{ActivityType, UserActivity};
