//! Member-facing report handlers.

use axum::Json;
use axum::extract::State;

use biblio_service::report::{GenrePopularityReport, MonthlyTrendReport, UserStatistics};

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/reports/genres
pub async fn genre_popularity(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<GenrePopularityReport>>> {
    let report = state.report_service.genre_popularity().await?;
    Ok(Json(ApiResponse::ok(report)))
}

/// GET /api/reports/monthly-trends
pub async fn monthly_trends(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<MonthlyTrendReport>>> {
    let report = state.report_service.monthly_trends().await?;
    Ok(Json(ApiResponse::ok(report)))
}

/// GET /api/reports/me
pub async fn my_statistics(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<UserStatistics>>> {
    let stats = state.report_service.user_statistics(&auth.user_id).await?;
    Ok(Json(ApiResponse::ok(stats)))
}
