//! Admin-only handlers.

pub mod inventory;
pub mod stats;
pub mod users;
