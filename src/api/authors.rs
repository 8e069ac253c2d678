//! Author endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{Author, AuthorDetails, AuthorInput, AuthorPage, PageQuery, Permission},
    AppState,
};

use super::AuthenticatedUser;

/// List authors ordered by last name then first name
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of authors", body = AuthorPage)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<AuthorPage>> {
    let page = state.services.authors.list(query).await?;
    Ok(Json(page))
}

/// Get an author with their books
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDetails),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetails>> {
    let author = state.services.authors.get(id).await?;
    Ok(Json(author))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = AuthorInput,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Missing can_edit_authors")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<AuthorInput>,
) -> AppResult<(StatusCode, Json<Author>)> {
    claims.require(Permission::CanEditAuthors)?;

    let author = state.services.authors.create(data).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Replace an author's fields
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    request_body = AuthorInput,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Missing can_edit_authors"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<AuthorInput>,
) -> AppResult<Json<Author>> {
    claims.require(Permission::CanEditAuthors)?;

    let author = state.services.authors.update(id, data).await?;
    Ok(Json(author))
}

/// Delete an author; their books are kept without an author
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 403, description = "Missing can_edit_authors"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require(Permission::CanEditAuthors)?;

    state.services.authors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
