//! Copy endpoints: creation, detail and loan transitions

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        copy::{CreateCopy, LendCopy, RenewCopy, RenewalProposal},
        BookCopy, CopyDetails, Permission,
    },
    AppState,
};

use super::{today, AuthenticatedUser};

/// Result of a loan transition
#[derive(Serialize, ToSchema)]
pub struct LoanResponse {
    /// Copy after the transition
    pub copy: BookCopy,
    pub is_overdue: bool,
    /// Status message
    pub message: String,
}

impl LoanResponse {
    fn new(copy: BookCopy, message: &str) -> Self {
        Self {
            is_overdue: copy.is_overdue(today()),
            copy,
            message: message.to_string(),
        }
    }
}

/// Add a copy to a book
#[utoipa::path(
    post,
    path = "/books/{id}/copies",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = CreateCopy,
    responses(
        (status = 201, description = "Copy created", body = BookCopy),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Missing can_edit_books"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_copy(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
    Json(data): Json<CreateCopy>,
) -> AppResult<(StatusCode, Json<BookCopy>)> {
    claims.require(Permission::CanEditBooks)?;

    let copy = state.services.copies.create(book_id, data).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// Get a copy
#[utoipa::path(
    get,
    path = "/copies/{id}",
    tag = "copies",
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Copy details", body = CopyDetails),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn get_copy(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<CopyDetails>> {
    let copy = state.services.copies.get(id, today()).await?;
    Ok(Json(copy))
}

/// Lend a copy to a borrower
#[utoipa::path(
    post,
    path = "/copies/{id}/loan",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    request_body = LendCopy,
    responses(
        (status = 200, description = "Copy lent", body = LoanResponse),
        (status = 400, description = "Due-back date outside the allowed window"),
        (status = 403, description = "Missing can_mark_returned"),
        (status = 404, description = "Copy or borrower not found"),
        (status = 409, description = "Copy changed concurrently"),
        (status = 422, description = "Copy already on loan")
    )
)]
pub async fn lend_copy(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<LendCopy>,
) -> AppResult<Json<LoanResponse>> {
    claims.require(Permission::CanMarkReturned)?;

    let copy = state.services.loans.lend(id, &request, today()).await?;
    Ok(Json(LoanResponse::new(copy, "Copy lent")))
}

/// Renewal form data: the copy and the proposed due-back date
#[utoipa::path(
    get,
    path = "/copies/{id}/renew",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Renewal proposal", body = RenewalProposal),
        (status = 403, description = "Missing can_renew"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn get_renewal(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewalProposal>> {
    claims.require(Permission::CanRenew)?;

    let proposal = state.services.loans.renewal_proposal(id, today()).await?;
    Ok(Json(proposal))
}

/// Renew a loan with a new due-back date
#[utoipa::path(
    post,
    path = "/copies/{id}/renew",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    request_body = RenewCopy,
    responses(
        (status = 200, description = "Loan renewed", body = LoanResponse),
        (status = 400, description = "Date in the past or more than 4 weeks ahead"),
        (status = 403, description = "Missing can_renew"),
        (status = 404, description = "Copy not found"),
        (status = 409, description = "Copy changed concurrently"),
        (status = 422, description = "Copy not on loan")
    )
)]
pub async fn renew_copy(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RenewCopy>,
) -> AppResult<Json<LoanResponse>> {
    claims.require(Permission::CanRenew)?;

    let copy = state.services.loans.renew(id, request.due_back, today()).await?;
    Ok(Json(LoanResponse::new(copy, "Loan renewed")))
}

/// Mark a copy as returned
#[utoipa::path(
    post,
    path = "/copies/{id}/return",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Copy returned", body = LoanResponse),
        (status = 403, description = "Missing can_mark_returned"),
        (status = 404, description = "Copy not found"),
        (status = 409, description = "Copy changed concurrently"),
        (status = 422, description = "Copy not on loan")
    )
)]
pub async fn return_copy(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LoanResponse>> {
    claims.require(Permission::CanMarkReturned)?;

    let copy = state.services.loans.mark_returned(id).await?;
    Ok(Json(LoanResponse::new(copy, "Marked as returned")))
}
