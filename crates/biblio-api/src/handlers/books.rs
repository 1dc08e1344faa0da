//! Catalog browsing handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use biblio_core::types::pagination::PageResponse;
use biblio_entity::book::{Book, BookSummary};

use crate::dto::request::SearchParams;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/books
pub async fn list_books(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<SearchParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<BookSummary>>>> {
    let page = state
        .catalog_service
        .list_books(filter.search, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/books/genres
pub async fn list_genres(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<String>>>> {
    let genres = state.catalog_service.genres().await?;
    Ok(Json(ApiResponse::ok(genres)))
}

/// GET /api/books/{book_id}
pub async fn get_book(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(book_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Book>>> {
    let book = state.catalog_service.get_book(&book_id).await?;
    Ok(Json(ApiResponse::ok(book)))
}
