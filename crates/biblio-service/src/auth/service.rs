//! Signup, login, and logout flows with activity recording.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use biblio_auth::jwt::JwtEncoder;
use biblio_auth::password::PasswordHasher;
use biblio_core::config::auth::AuthConfig;
use biblio_core::error::AppError;
use biblio_core::result::AppResult;
use biblio_database::repositories::activity::ActivityRepository;
use biblio_database::repositories::user::UserRepository;
use biblio_entity::activity::ActivityType;
use biblio_entity::user::{CreateUser, User, UserRole};

use crate::context::RequestContext;

/// Failed logins never reveal whether the ID or the password was wrong.
const INVALID_CREDENTIALS: &str = "Invalid user ID or password";

/// Handles account creation and session entry/exit.
#[derive(Debug, Clone)]
pub struct AuthService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Activity ledger repository.
    activity_repo: Arc<ActivityRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Token encoder.
    encoder: Arc<JwtEncoder>,
    /// Auth policy (password length, admin signup code).
    config: AuthConfig,
}

/// Data for registering a new account.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SignupData {
    /// Desired user identifier.
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Plaintext password; hashed before storage.
    pub password: String,
    /// Requested role.
    pub user_type: UserRole,
    /// Required when requesting the admin role.
    pub admin_code: Option<String>,
}

/// Result of a successful login.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LoginOutcome {
    /// Signed access token.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// The authenticated user.
    pub user: User,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        activity_repo: Arc<ActivityRepository>,
        hasher: Arc<PasswordHasher>,
        encoder: Arc<JwtEncoder>,
        config: AuthConfig,
    ) -> Self {
        Self {
            user_repo,
            activity_repo,
            hasher,
            encoder,
            config,
        }
    }

    /// Registers a new account and records a signup activity.
    ///
    /// Admin accounts require the configured signup code; an empty
    /// configured code disables admin signup entirely.
    pub async fn signup(&self, data: SignupData) -> AppResult<User> {
        let user_id = data.user_id.trim();
        if user_id.is_empty() {
            return Err(AppError::validation("User ID is required"));
        }
        if data.name.trim().is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        if data.password.len() < self.config.password_min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.config.password_min_length
            )));
        }

        if data.user_type.is_admin() {
            if self.config.admin_signup_code.is_empty() {
                return Err(AppError::authorization("Admin signup is disabled"));
            }
            if data.admin_code.as_deref() != Some(self.config.admin_signup_code.as_str()) {
                return Err(AppError::authorization("Invalid admin signup code"));
            }
        }

        let password_hash = self.hasher.hash(&data.password)?;
        let user = self
            .user_repo
            .create(&CreateUser {
                user_id: user_id.to_string(),
                name: data.name.trim().to_string(),
                password_hash,
                user_type: data.user_type,
            })
            .await?;

        self.activity_repo
            .record(&user.user_id, ActivityType::Signup)
            .await?;

        info!(user_id = %user.user_id, role = %user.user_type, "User registered");
        Ok(user)
    }

    /// Verifies credentials, issues a token, and records a login activity.
    pub async fn login(&self, user_id: &str, password: &str) -> AppResult<LoginOutcome> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::authentication(INVALID_CREDENTIALS))?;

        if !self.hasher.verify(password, &user.password_hash)? {
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        let (token, expires_at) =
            self.encoder
                .generate_token(&user.user_id, user.user_type, &user.name)?;

        self.activity_repo
            .record(&user.user_id, ActivityType::Login)
            .await?;

        info!(user_id = %user.user_id, "User logged in");
        Ok(LoginOutcome {
            token,
            expires_at,
            user,
        })
    }

    /// Records a logout activity for the calling user.
    ///
    /// Tokens are stateless, so logout is a ledger event consumed by the
    /// daily report rather than a revocation.
    pub async fn logout(&self, ctx: &RequestContext) -> AppResult<()> {
        self.activity_repo
            .record(&ctx.user_id, ActivityType::Logout)
            .await?;

        info!(user_id = %ctx.user_id, "User logged out");
        Ok(())
    }
}
