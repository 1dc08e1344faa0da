//! Report projection rows.

pub mod model;

pub use model::{DailyCheckoutCount, GenreCount, MonthlyGenreCount, PopularBook};
