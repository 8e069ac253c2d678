//! Language model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Language {
    pub id: i32,
    pub name: String,
}

/// Create language request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLanguage {
    #[validate(length(min = 1, max = 64, message = "Name must be 1 to 64 characters"))]
    pub name: String,
}
