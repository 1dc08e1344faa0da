//! Circulation policy configuration.

use serde::{Deserialize, Serialize};

/// Lending rules and reporting windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CirculationConfig {
    /// Maximum number of books a member may have out at once.
    #[serde(default = "default_max_open_checkouts")]
    pub max_open_checkouts: i64,
    /// Number of trailing months covered by the monthly trend report.
    #[serde(default = "default_trend_months")]
    pub trend_window_months: u32,
    /// Number of trailing days considered for the reading streak.
    #[serde(default = "default_streak_days")]
    pub streak_window_days: i64,
}

impl Default for CirculationConfig {
    fn default() -> Self {
        Self {
            max_open_checkouts: default_max_open_checkouts(),
            trend_window_months: default_trend_months(),
            streak_window_days: default_streak_days(),
        }
    }
}

fn default_max_open_checkouts() -> i64 {
    5
}

fn default_trend_months() -> u32 {
    6
}

fn default_streak_days() -> i64 {
    30
}
