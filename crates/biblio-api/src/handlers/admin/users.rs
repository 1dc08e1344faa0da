//! Admin member directory handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use crate::dto::request::SearchParams;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<SearchParams>,
) -> ApiResult<Json<serde_json::Value>> {
    require_admin(&auth)?;

    let page = state
        .user_service
        .list_users(filter.search, params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": page })))
}

/// GET /api/admin/users/{user_id}/history
pub async fn user_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    require_admin(&auth)?;

    let history = state.user_service.user_history(&user_id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": history })))
}

/// GET /api/admin/users/{user_id}/last-activity
pub async fn last_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    require_admin(&auth)?;

    let summary = state.user_service.last_activity(&user_id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": summary })))
}
