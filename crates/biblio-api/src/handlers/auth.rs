//! Auth handlers: signup, login, logout, me.

use std::str::FromStr;

use axum::Json;
use axum::extract::State;

use biblio_entity::user::{User, UserRole};
use biblio_service::auth::SignupData;

use crate::dto;
use crate::dto::request::{LoginRequest, SignupRequest};
use crate::dto::response::{ApiResponse, LoginResponse, MessageResponse, ProfileResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<Json<ApiResponse<User>>> {
    dto::validate(&req)?;

    let user_type = match req.user_type.as_deref() {
        Some(raw) => UserRole::from_str(raw)?,
        None => UserRole::User,
    };

    let user = state
        .auth_service
        .signup(SignupData {
            user_id: req.user_id,
            name: req.name,
            password: req.password,
            user_type,
            admin_code: req.admin_code,
        })
        .await?;

    Ok(Json(ApiResponse::ok(user)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    dto::validate(&req)?;

    let outcome = state
        .auth_service
        .login(&req.user_id, &req.password)
        .await?;

    Ok(Json(ApiResponse::ok(LoginResponse {
        token: outcome.token,
        expires_at: outcome.expires_at,
        user: outcome.user,
    })))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.auth_service.logout(auth.context()).await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Logged out successfully".to_string(),
    })))
}

/// GET /api/auth/me
///
/// Returns the identity carried in the token; no database round trip.
pub async fn me(auth: AuthUser) -> Json<ApiResponse<ProfileResponse>> {
    Json(ApiResponse::ok(ProfileResponse {
        user_id: auth.user_id.clone(),
        name: auth.name.clone(),
        user_type: auth.role,
    }))
}
