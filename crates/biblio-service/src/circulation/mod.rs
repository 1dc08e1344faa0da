//! Circulation ledger services.

pub mod service;

pub use service::CirculationService;
