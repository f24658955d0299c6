// HTTP handlers for book endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::books::{Book, BookRequest};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::pagination::{Page, PageParams, PageRequest};
use crate::AppState;

/// Handler for GET /api/books/v1
pub async fn list_books_handler(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Page<Book>>, ApiError> {
    let request = PageRequest::try_from(params)?;
    let page = state.books.find_all(request).await?;
    Ok(Json(page))
}

/// Handler for GET /api/books/v1/{id}
pub async fn get_book_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Book>, ApiError> {
    let book = state.books.find_by_id(id).await?;
    Ok(Json(book))
}

/// Handler for POST /api/books/v1
pub async fn create_book_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BookRequest>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let book = state.books.create(request).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Handler for PUT /api/books/v1
pub async fn update_book_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BookRequest>,
) -> Result<Json<Book>, ApiError> {
    let book = state.books.update(request).await?;
    Ok(Json(book))
}

/// Handler for DELETE /api/books/v1/{id}
pub async fn delete_book_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
