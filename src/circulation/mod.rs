//! Circulation rules: due-back date window and copy loan state machine.
//!
//! Pure code, no I/O. The loans service applies these rules against the
//! copy store.

pub mod renewal;
pub mod state;

pub use renewal::{validate, RenewalDateError};
pub use state::{LoanAction, LoanState, TransitionError};
