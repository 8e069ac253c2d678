//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{Book, BookDetails, BookInput, BookPage, PageQuery, Permission},
    AppState,
};

use super::{today, AuthenticatedUser};

/// List books ordered by title, 10 per page
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of books", body = BookPage)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<BookPage>> {
    let page = state.services.catalog.list_books(query).await?;
    Ok(Json(page))
}

/// Get book details with author, language, genres and copies
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<BookDetails>> {
    let book = state.services.catalog.get_book(id, today()).await?;
    Ok(Json(book))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Missing can_edit_books"),
        (status = 404, description = "Author, language or genre not found")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<BookInput>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require(Permission::CanEditBooks)?;

    let book = state.services.catalog.create_book(data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Replace a book's fields and genres
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Missing can_edit_books"),
        (status = 404, description = "Book or referenced entity not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<BookInput>,
) -> AppResult<Json<Book>> {
    claims.require(Permission::CanEditBooks)?;

    let book = state.services.catalog.update_book(id, data).await?;
    Ok(Json(book))
}

/// Delete a book and all of its copies
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 403, description = "Missing can_edit_books"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require(Permission::CanEditBooks)?;

    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
