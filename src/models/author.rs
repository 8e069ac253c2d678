//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::book::BookSummary;

/// Author row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// "Last, First"
    pub fn display_name(&self) -> String {
        display_name(&self.first_name, &self.last_name)
    }
}

pub fn display_name(first_name: &str, last_name: &str) -> String {
    format!("{}, {}", last_name, first_name)
}

/// Author with their books
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorDetails {
    #[serde(flatten)]
    pub author: Author,
    pub display_name: String,
    pub books: Vec<BookSummary>,
}

/// Create / update author request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_lifespan"))]
pub struct AuthorInput {
    #[validate(length(min = 1, max = 100, message = "First name must be 1 to 100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1 to 100 characters"))]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

fn validate_lifespan(input: &AuthorInput) -> Result<(), ValidationError> {
    match (input.date_of_birth, input.date_of_death) {
        (Some(born), Some(died)) if died < born => {
            let mut err = ValidationError::new("lifespan");
            err.message = Some("Date of death cannot be before date of birth".into());
            Err(err)
        }
        _ => Ok(()),
    }
}
