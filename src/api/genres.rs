//! Genre and language endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        genre::CreateGenre,
        language::CreateLanguage,
        Genre, GenreBooks, Language, Permission,
    },
    AppState,
};

use super::AuthenticatedUser;

/// List genres ordered by name
#[utoipa::path(
    get,
    path = "/genres",
    tag = "genres",
    responses(
        (status = 200, description = "Genres", body = Vec<Genre>)
    )
)]
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.services.catalog.list_genres().await?;
    Ok(Json(genres))
}

/// Books tagged with a genre
#[utoipa::path(
    get,
    path = "/genres/{id}/books",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre and its books", body = GenreBooks),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn list_genre_books(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<GenreBooks>> {
    let books = state.services.catalog.books_by_genre(id).await?;
    Ok(Json(books))
}

/// Create a genre
#[utoipa::path(
    post,
    path = "/genres",
    tag = "genres",
    security(("bearer_auth" = [])),
    request_body = CreateGenre,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 403, description = "Missing can_edit_books")
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateGenre>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    claims.require(Permission::CanEditBooks)?;

    let genre = state.services.catalog.create_genre(data).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

/// List languages ordered by name
#[utoipa::path(
    get,
    path = "/languages",
    tag = "genres",
    responses(
        (status = 200, description = "Languages", body = Vec<Language>)
    )
)]
pub async fn list_languages(State(state): State<AppState>) -> AppResult<Json<Vec<Language>>> {
    let languages = state.services.catalog.list_languages().await?;
    Ok(Json(languages))
}

/// Create a language
#[utoipa::path(
    post,
    path = "/languages",
    tag = "genres",
    security(("bearer_auth" = [])),
    request_body = CreateLanguage,
    responses(
        (status = 201, description = "Language created", body = Language),
        (status = 403, description = "Missing can_edit_books")
    )
)]
pub async fn create_language(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateLanguage>,
) -> AppResult<(StatusCode, Json<Language>)> {
    claims.require(Permission::CanEditBooks)?;

    let language = state.services.catalog.create_language(data).await?;
    Ok((StatusCode::CREATED, Json(language)))
}
