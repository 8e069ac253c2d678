//! Due-back date window for renewals and new loans

use chrono::{Duration, NaiveDate};
use thiserror::Error;

/// Furthest a due-back date may be set ahead of today, in days (4 weeks)
pub const MAX_EXTENSION_DAYS: i64 = 28;

/// Due-back date suggested to staff when opening a renewal (3 weeks)
pub const PROPOSED_EXTENSION_DAYS: i64 = 21;

/// Rejected due-back date. The offending date is carried for display.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalDateError {
    #[error("Invalid date {0}: the due-back date cannot be in the past")]
    DateInPast(NaiveDate),

    #[error("Invalid date {0}: choose a date no more than 4 weeks from today")]
    DateTooFarAhead(NaiveDate),
}

impl RenewalDateError {
    /// The date that failed validation
    pub fn date(&self) -> NaiveDate {
        match self {
            RenewalDateError::DateInPast(d) | RenewalDateError::DateTooFarAhead(d) => *d,
        }
    }
}

/// Check a proposed due-back date against `today`.
///
/// Both ends of the window are inclusive: `today` and `today + 28 days` are
/// accepted, anything before or after is rejected.
pub fn validate(proposed: NaiveDate, today: NaiveDate) -> Result<NaiveDate, RenewalDateError> {
    if proposed < today {
        return Err(RenewalDateError::DateInPast(proposed));
    }

    if proposed > latest_allowed(today) {
        return Err(RenewalDateError::DateTooFarAhead(proposed));
    }

    Ok(proposed)
}

/// Last date accepted by [`validate`] for the given day
pub fn latest_allowed(today: NaiveDate) -> NaiveDate {
    today + Duration::days(MAX_EXTENSION_DAYS)
}

/// Default value offered to the caller. Not a validation rule.
pub fn proposed_date(today: NaiveDate) -> NaiveDate {
    today + Duration::days(PROPOSED_EXTENSION_DAYS)
}
