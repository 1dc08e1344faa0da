//! Member directory and per-member auditing for admins.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use biblio_core::error::AppError;
use biblio_core::result::AppResult;
use biblio_core::types::pagination::{PageRequest, PageResponse};
use biblio_database::repositories::activity::ActivityRepository;
use biblio_database::repositories::checkout::CheckoutRepository;
use biblio_database::repositories::user::UserRepository;
use biblio_database::retry::retry_read;
use biblio_entity::activity::ActivityType;
use biblio_entity::checkout::CheckoutRecord;
use biblio_entity::user::User;

/// Admin-facing views over members and their account activity.
#[derive(Debug, Clone)]
pub struct UserService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Checkout repository.
    checkout_repo: Arc<CheckoutRepository>,
    /// Activity ledger repository.
    activity_repo: Arc<ActivityRepository>,
}

/// The most recent timestamp of each account event for one member.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LastActivity {
    /// The member.
    pub user_id: String,
    /// Most recent login, if any.
    pub last_login: Option<DateTime<Utc>>,
    /// Most recent logout, if any.
    pub last_logout: Option<DateTime<Utc>>,
    /// When the account was created, if recorded.
    pub last_signup: Option<DateTime<Utc>>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        checkout_repo: Arc<CheckoutRepository>,
        activity_repo: Arc<ActivityRepository>,
    ) -> Self {
        Self {
            user_repo,
            checkout_repo,
            activity_repo,
        }
    }

    /// Page through registered members, optionally filtered by ID or name.
    pub async fn list_users(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> AppResult<PageResponse<User>> {
        let search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        retry_read(|| self.user_repo.find_all(search.as_deref(), &page)).await
    }

    /// A member's full borrowing history, open checkouts first.
    pub async fn user_history(&self, user_id: &str) -> AppResult<Vec<CheckoutRecord>> {
        retry_read(|| self.compute_history(user_id)).await
    }

    /// The most recent login, logout, and signup timestamps for a member.
    pub async fn last_activity(&self, user_id: &str) -> AppResult<LastActivity> {
        retry_read(|| self.compute_last_activity(user_id)).await
    }

    async fn compute_history(&self, user_id: &str) -> AppResult<Vec<CheckoutRecord>> {
        self.require_user(user_id).await?;
        self.checkout_repo.history_by_user(user_id).await
    }

    async fn compute_last_activity(&self, user_id: &str) -> AppResult<LastActivity> {
        self.require_user(user_id).await?;

        let mut summary = LastActivity {
            user_id: user_id.to_string(),
            last_login: None,
            last_logout: None,
            last_signup: None,
        };
        for entry in self.activity_repo.latest_by_type(user_id).await? {
            match entry.activity_type {
                ActivityType::Login => summary.last_login = Some(entry.timestamp),
                ActivityType::Logout => summary.last_logout = Some(entry.timestamp),
                ActivityType::Signup => summary.last_signup = Some(entry.timestamp),
            }
        }
        Ok(summary)
    }

    async fn require_user(&self, user_id: &str) -> AppResult<()> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;
        Ok(())
    }
}
