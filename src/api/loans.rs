//! Loan listing endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{CopyPage, PageQuery, Permission},
    AppState,
};

use super::{today, AuthenticatedUser};

/// Copies on loan to the authenticated user, by due-back date
#[utoipa::path(
    get,
    path = "/loans/mine",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Borrowed copies", body = CopyPage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_loans(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<CopyPage>> {
    let page = state.services.copies.borrowed_by(claims.sub, query, today()).await?;
    Ok(Json(page))
}

/// Every copy on loan, by due-back date
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Copies on loan", body = CopyPage),
        (status = 403, description = "Missing can_mark_returned")
    )
)]
pub async fn all_loans(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<CopyPage>> {
    claims.require(Permission::CanMarkReturned)?;

    let page = state.services.copies.all_on_loan(query, today()).await?;
    Ok(Json(page))
}
