//! Loan state of a book copy and the transitions between states

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::renewal::{self, RenewalDateError};
use crate::models::copy::CopyStatus;

/// Loan-related columns of a copy.
///
/// A copy `OnLoan` always has both a borrower and a due-back date; a copy in
/// any other status has neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LoanState {
    pub status: CopyStatus,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
}

/// Operations of the loan state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanAction {
    Lend,
    Renew,
    Return,
}

impl std::fmt::Display for LoanAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LoanAction::Lend => "lend",
            LoanAction::Renew => "renew",
            LoanAction::Return => "return",
        };
        write!(f, "{}", label)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Cannot {action} a copy with status {from}")]
    NotAllowed { action: LoanAction, from: CopyStatus },

    #[error(transparent)]
    DueBack(#[from] RenewalDateError),

    #[error("{0}")]
    Inconsistent(String),
}

impl LoanState {
    /// State of a copy that is not lent out
    pub fn idle(status: CopyStatus) -> Self {
        Self {
            status,
            due_back: None,
            borrower_id: None,
        }
    }

    pub fn on_loan(borrower_id: i32, due_back: NaiveDate) -> Self {
        Self {
            status: CopyStatus::OnLoan,
            due_back: Some(due_back),
            borrower_id: Some(borrower_id),
        }
    }

    /// Check the OnLoan / borrower / due-back invariant
    pub fn check_consistent(&self) -> Result<(), TransitionError> {
        match (self.status, self.borrower_id, self.due_back) {
            (CopyStatus::OnLoan, Some(_), Some(_)) => Ok(()),
            (CopyStatus::OnLoan, _, _) => Err(TransitionError::Inconsistent(
                "A copy on loan needs a borrower and a due-back date".to_string(),
            )),
            (_, None, None) => Ok(()),
            (status, _, _) => Err(TransitionError::Inconsistent(format!(
                "A copy with status {} cannot have a borrower or a due-back date",
                status
            ))),
        }
    }

    /// Maintenance / Available / Reserved -> OnLoan
    pub fn lend(
        &self,
        borrower_id: i32,
        due_back: NaiveDate,
        today: NaiveDate,
    ) -> Result<LoanState, TransitionError> {
        if self.status == CopyStatus::OnLoan {
            return Err(self.not_allowed(LoanAction::Lend));
        }
        let due_back = renewal::validate(due_back, today)?;
        Ok(LoanState::on_loan(borrower_id, due_back))
    }

    /// OnLoan -> OnLoan with a new due-back date; borrower is kept
    pub fn renew(&self, proposed: NaiveDate, today: NaiveDate) -> Result<LoanState, TransitionError> {
        if self.status != CopyStatus::OnLoan {
            return Err(self.not_allowed(LoanAction::Renew));
        }
        let due_back = renewal::validate(proposed, today)?;
        Ok(LoanState {
            due_back: Some(due_back),
            ..*self
        })
    }

    /// OnLoan -> Available, clearing borrower and due-back date
    pub fn mark_returned(&self) -> Result<LoanState, TransitionError> {
        if self.status != CopyStatus::OnLoan {
            return Err(self.not_allowed(LoanAction::Return));
        }
        Ok(LoanState::idle(CopyStatus::Available))
    }

    fn not_allowed(&self, action: LoanAction) -> TransitionError {
        TransitionError::NotAllowed {
            action,
            from: self.status,
        }
    }
}
