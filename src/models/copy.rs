//! Book copy (physical loanable instance) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::circulation::LoanState;

/// Copy availability status, stored as a single-letter code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CopyStatus {
    #[default]
    Maintenance,
    OnLoan,
    Available,
    Reserved,
}

impl CopyStatus {
    /// Database code for this status
    pub fn as_code(&self) -> &'static str {
        match self {
            CopyStatus::Maintenance => "m",
            CopyStatus::OnLoan => "o",
            CopyStatus::Available => "a",
            CopyStatus::Reserved => "r",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "m" => Some(CopyStatus::Maintenance),
            "o" => Some(CopyStatus::OnLoan),
            "a" => Some(CopyStatus::Available),
            "r" => Some(CopyStatus::Reserved),
            _ => None,
        }
    }
}

impl std::fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CopyStatus::Maintenance => "Maintenance",
            CopyStatus::OnLoan => "On loan",
            CopyStatus::Available => "Available",
            CopyStatus::Reserved => "Reserved",
        };
        write!(f, "{}", label)
    }
}

// SQLx conversion for CopyStatus
impl sqlx::Type<Postgres> for CopyStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for CopyStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        CopyStatus::from_code(&s).ok_or_else(|| format!("Invalid copy status code: {}", s).into())
    }
}

impl Encode<'_, Postgres> for CopyStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_code().to_string(), buf)
    }
}

/// Copy row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookCopy {
    pub id: Uuid,
    pub book_id: i32,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub status: CopyStatus,
}

impl BookCopy {
    pub fn loan_state(&self) -> LoanState {
        LoanState {
            status: self.status,
            due_back: self.due_back,
            borrower_id: self.borrower_id,
        }
    }

    /// Overwrite the loan columns with `state`
    pub fn with_loan_state(self, state: LoanState) -> Self {
        Self {
            status: state.status,
            due_back: state.due_back,
            borrower_id: state.borrower_id,
            ..self
        }
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        is_overdue(self.due_back, today)
    }
}

/// Due-back date set and strictly before `today`
pub fn is_overdue(due_back: Option<NaiveDate>, today: NaiveDate) -> bool {
    due_back.map(|d| d < today).unwrap_or(false)
}

/// Copy joined with its book title, used for listings and detail
#[derive(Debug, Clone, FromRow)]
pub struct CopyRow {
    pub id: Uuid,
    pub book_id: i32,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub status: CopyStatus,
    pub book_title: String,
}

/// Copy as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CopyDetails {
    pub id: Uuid,
    pub book_id: i32,
    pub book_title: String,
    /// "<id> (<book title>)"
    pub label: String,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub status: CopyStatus,
    pub is_overdue: bool,
}

impl CopyDetails {
    pub fn from_row(row: CopyRow, today: NaiveDate) -> Self {
        Self {
            is_overdue: is_overdue(row.due_back, today),
            label: format!("{} ({})", row.id, row.book_title),
            id: row.id,
            book_id: row.book_id,
            book_title: row.book_title,
            imprint: row.imprint,
            due_back: row.due_back,
            borrower_id: row.borrower_id,
            status: row.status,
        }
    }
}

/// Create copy request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCopy {
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1 to 200 characters"))]
    pub imprint: String,
    /// Initial status; defaults to maintenance. On loan is not accepted here.
    pub status: Option<CopyStatus>,
}

/// Lend request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LendCopy {
    pub borrower_id: i32,
    pub due_back: NaiveDate,
}

/// Renew request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RenewCopy {
    pub due_back: NaiveDate,
}

/// Data for the renewal form: the copy and the suggested new date
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RenewalProposal {
    pub copy: BookCopy,
    pub is_overdue: bool,
    /// Suggested due-back date (today + 3 weeks)
    pub proposed_due_back: NaiveDate,
    /// Latest date a renewal accepts (today + 4 weeks)
    pub latest_due_back: NaiveDate,
}
