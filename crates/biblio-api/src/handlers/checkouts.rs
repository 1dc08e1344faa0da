//! Circulation handlers: checkout, return, eligibility.

use axum::Json;
use axum::extract::{Path, State};

use biblio_core::error::AppError;
use biblio_entity::checkout::{Checkout, CheckoutEligibility, CheckoutRecord};

use crate::dto;
use crate::dto::request::{CheckoutRequest, ReturnRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/checkouts
pub async fn my_checkouts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<CheckoutRecord>>>> {
    let open = state
        .circulation_service
        .open_checkouts(auth.context())
        .await?;
    Ok(Json(ApiResponse::ok(open)))
}

/// POST /api/checkouts
pub async fn checkout_book(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<Json<ApiResponse<Checkout>>> {
    dto::validate(&req)?;

    let checkout = state
        .circulation_service
        .checkout(auth.context(), &req.book_id)
        .await?;
    Ok(Json(ApiResponse::ok(checkout)))
}

/// POST /api/checkouts/return
///
/// Accepts `{book_id}` for a single return or `{book_ids}` for an
/// all-or-nothing batch. Responds with every checkout that was closed.
pub async fn return_books(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ReturnRequest>,
) -> ApiResult<Json<ApiResponse<Vec<Checkout>>>> {
    let closed = match (req.book_id, req.book_ids) {
        (Some(book_id), None) => {
            vec![
                state
                    .circulation_service
                    .checkin(auth.context(), &book_id)
                    .await?,
            ]
        }
        (None, Some(book_ids)) => {
            state
                .circulation_service
                .checkin_many(auth.context(), &book_ids)
                .await?
        }
        _ => {
            return Err(AppError::validation("Provide either book_id or book_ids").into());
        }
    };

    Ok(Json(ApiResponse::ok(closed)))
}

/// GET /api/checkouts/eligibility/{book_id}
pub async fn eligibility(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(book_id): Path<String>,
) -> ApiResult<Json<ApiResponse<CheckoutEligibility>>> {
    let summary = state
        .circulation_service
        .eligibility(auth.context(), &book_id)
        .await?;
    Ok(Json(ApiResponse::ok(summary)))
}
