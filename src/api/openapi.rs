//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, catalog, copies, genres, health, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Library catalog REST API: books, authors, genres, languages and loanable copies"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        catalog::get_summary,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Genres and languages
        genres::list_genres,
        genres::list_genre_books,
        genres::create_genre,
        genres::list_languages,
        genres::create_language,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Copies
        copies::create_copy,
        copies::get_copy,
        copies::lend_copy,
        copies::get_renewal,
        copies::renew_copy,
        copies::return_copy,
        // Loans
        loans::my_loans,
        loans::all_loans,
    ),
    components(
        schemas(
            // Catalog
            crate::services::catalog::CatalogSummary,
            // Books
            crate::models::Book,
            crate::models::BookSummary,
            crate::models::BookDetails,
            crate::models::BookInput,
            crate::models::BookPage,
            crate::models::GenreBooks,
            crate::models::Genre,
            crate::models::genre::CreateGenre,
            crate::models::Language,
            crate::models::language::CreateLanguage,
            // Authors
            crate::models::Author,
            crate::models::AuthorDetails,
            crate::models::AuthorInput,
            crate::models::AuthorPage,
            // Copies
            crate::models::BookCopy,
            crate::models::CopyDetails,
            crate::models::CopyStatus,
            crate::models::CopyPage,
            crate::models::copy::CreateCopy,
            crate::models::copy::LendCopy,
            crate::models::copy::RenewCopy,
            crate::models::copy::RenewalProposal,
            copies::LoanResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Catalog summary"),
        (name = "books", description = "Book management"),
        (name = "genres", description = "Genres and languages"),
        (name = "authors", description = "Author management"),
        (name = "copies", description = "Copies and loan transitions"),
        (name = "loans", description = "Loan listings")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_loan_transitions() {
        let doc = ApiDoc::openapi();
        for path in ["/copies/{id}/renew", "/copies/{id}/return", "/copies/{id}/loan"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
