//! Admin dashboard and daily report handlers.

use axum::Json;
use axum::extract::State;

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/stats
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    require_admin(&auth)?;

    let stats = state.report_service.dashboard().await?;
    Ok(Json(serde_json::json!({ "success": true, "data": stats })))
}

/// GET /api/admin/reports/daily
pub async fn daily_report(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    require_admin(&auth)?;

    let summary = state.report_service.daily_summary().await?;
    Ok(Json(serde_json::json!({ "success": true, "data": summary })))
}
