//! User activity ledger entity model.
//!
//! Activities feed the daily report; they are append-only and never
//! updated after insertion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// The kinds of account events the ledger records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "activity_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    /// Successful login.
    Login,
    /// Explicit logout.
    Logout,
    /// Account creation.
    Signup,
}

impl ActivityType {
    /// Return the activity as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Logout => "logout",
            Self::Signup => "signup",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recorded account event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserActivity {
    /// Ledger sequence number.
    pub id: i64,
    /// The acting user.
    pub user_id: String,
    /// What happened.
    pub activity_type: ActivityType,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
}
