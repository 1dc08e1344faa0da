//! User activity ledger repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use biblio_core::result::AppResult;
use biblio_entity::activity::{ActivityType, UserActivity};

use super::db_error;

/// Repository for the append-only account activity ledger.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    /// Create a new activity repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one activity to the ledger.
    pub async fn record(&self, user_id: &str, activity: ActivityType) -> AppResult<()> {
        sqlx::query("INSERT INTO user_activities (user_id, activity_type) VALUES ($1, $2)")
            .bind(user_id)
            .bind(activity)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to record activity", e))?;
        Ok(())
    }

    /// The most recent ledger entry of each activity type for a user.
    pub async fn latest_by_type(&self, user_id: &str) -> AppResult<Vec<UserActivity>> {
        sqlx::query_as::<_, UserActivity>(
            "SELECT DISTINCT ON (activity_type) * \
             FROM user_activities \
             WHERE user_id = $1 \
             ORDER BY activity_type, timestamp DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find latest activities", e))
    }

    /// Count ledger entries of one type at or after `since`.
    pub async fn count_since(
        &self,
        activity: ActivityType,
        since: DateTime<Utc>,
    ) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_activities WHERE activity_type = $1 AND timestamp >= $2",
        )
        .bind(activity)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count activities", e))
    }
}
