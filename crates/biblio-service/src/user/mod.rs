//! Member directory queries for admins.

pub mod service;

pub use service::{LastActivity, UserService};
