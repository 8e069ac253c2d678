//! API handlers for the catalog REST endpoints

pub mod authors;
pub mod books;
pub mod catalog;
pub mod copies;
pub mod genres;
pub mod health;
pub mod loans;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::NaiveDate;

use crate::{error::AppError, models::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        // Token holders become known borrowers
        state
            .services
            .repository
            .users
            .mirror(claims.sub, &claims.username)
            .await?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Current local date, the reference for due-back checks
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
