//! Admin inventory management handlers.

use axum::Json;
use axum::extract::{Path, State};

use biblio_entity::book::{CreateBook, UpdateBookDetails};

use crate::dto;
use crate::dto::request::{AdjustCopiesRequest, CreateBookRequest, UpdateBookRequest};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// POST /api/admin/books
pub async fn add_book(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateBookRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    require_admin(&auth)?;
    dto::validate(&req)?;

    let book = state
        .catalog_service
        .add_book(
            auth.context(),
            CreateBook {
                book_id: req.book_id,
                name: req.name,
                author: req.author,
                genre: req.genre,
                total_copies: req.total_copies,
            },
        )
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": book })))
}

/// PUT /api/admin/books/{book_id}
pub async fn update_book(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(book_id): Path<String>,
    Json(req): Json<UpdateBookRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    require_admin(&auth)?;

    let book = state
        .catalog_service
        .update_details(
            auth.context(),
            &book_id,
            UpdateBookDetails {
                name: req.name,
                author: req.author,
                genre: req.genre,
            },
        )
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": book })))
}

/// PUT /api/admin/books/{book_id}/copies
pub async fn adjust_copies(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(book_id): Path<String>,
    Json(req): Json<AdjustCopiesRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    require_admin(&auth)?;

    let book = state
        .circulation_service
        .adjust_copies(auth.context(), &book_id, req.increment)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": book })))
}

/// DELETE /api/admin/books/{book_id}
pub async fn delete_book(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(book_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    require_admin(&auth)?;

    state
        .circulation_service
        .delete_book(auth.context(), &book_id)
        .await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "message": "Book deleted" }
    })))
}
