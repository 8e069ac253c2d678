//! Loan management service: lend, renew and return copies

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    circulation::{renewal, LoanAction, LoanState},
    error::{AppError, AppResult},
    models::copy::{BookCopy, LendCopy, RenewalProposal},
    repository::CopyStore,
};

#[derive(Clone)]
pub struct LoansService {
    store: Arc<dyn CopyStore>,
}

impl LoansService {
    pub fn new(store: Arc<dyn CopyStore>) -> Self {
        Self { store }
    }

    /// Lend a copy to a borrower
    pub async fn lend(&self, copy_id: Uuid, request: &LendCopy, today: NaiveDate) -> AppResult<BookCopy> {
        if !self.store.borrower_exists(request.borrower_id).await? {
            return Err(AppError::NotFound(format!(
                "User with id {} not found",
                request.borrower_id
            )));
        }

        let copy = self.store.get_copy(copy_id).await?;
        let next = copy
            .loan_state()
            .lend(request.borrower_id, request.due_back, today)?;
        self.apply(copy, next, LoanAction::Lend).await
    }

    /// Move the due-back date of a copy on loan
    pub async fn renew(&self, copy_id: Uuid, proposed: NaiveDate, today: NaiveDate) -> AppResult<BookCopy> {
        let copy = self.store.get_copy(copy_id).await?;
        let next = copy.loan_state().renew(proposed, today)?;
        self.apply(copy, next, LoanAction::Renew).await
    }

    /// Mark a copy on loan as returned
    pub async fn mark_returned(&self, copy_id: Uuid) -> AppResult<BookCopy> {
        let copy = self.store.get_copy(copy_id).await?;
        let next = copy.loan_state().mark_returned()?;
        self.apply(copy, next, LoanAction::Return).await
    }

    /// Copy plus the suggested renewal date
    pub async fn renewal_proposal(&self, copy_id: Uuid, today: NaiveDate) -> AppResult<RenewalProposal> {
        let copy = self.store.get_copy(copy_id).await?;
        Ok(RenewalProposal {
            is_overdue: copy.is_overdue(today),
            copy,
            proposed_due_back: renewal::proposed_date(today),
            latest_due_back: renewal::latest_allowed(today),
        })
    }

    /// Write `next` only if the copy still holds the state it was read with
    async fn apply(&self, copy: BookCopy, next: LoanState, action: LoanAction) -> AppResult<BookCopy> {
        next.check_consistent()?;

        match self.store.compare_and_set(copy.id, copy.loan_state(), next).await? {
            Some(updated) => {
                tracing::info!(
                    copy_id = %updated.id,
                    %action,
                    status = %updated.status,
                    due_back = ?updated.due_back,
                    "Copy loan state changed"
                );
                Ok(updated)
            }
            None => {
                tracing::warn!(copy_id = %copy.id, %action, "Copy changed concurrently");
                Err(AppError::Conflict(format!(
                    "Copy {} was modified by another request, reload it and retry",
                    copy.id
                )))
            }
        }
    }
}
