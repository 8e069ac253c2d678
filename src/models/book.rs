//! Book (catalog title, not a physical copy) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{author::Author, copy::CopyDetails, genre::Genre, language::Language};

/// Number of genre names shown in listings
pub const DISPLAY_GENRE_COUNT: usize = 3;

/// Book row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    pub summary: String,
    pub isbn: String,
    pub language_id: i32,
}

/// Listing row: book with author name parts and its first genre names
#[derive(Debug, Clone, FromRow)]
pub struct BookSummaryRow {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    pub author_first_name: Option<String>,
    pub author_last_name: Option<String>,
    pub genre_names: Vec<String>,
}

/// Book as shown in listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    pub author_name: Option<String>,
    /// First genre names joined with ", "
    pub display_genre: String,
}

impl From<BookSummaryRow> for BookSummary {
    fn from(row: BookSummaryRow) -> Self {
        let author_name = match (&row.author_first_name, &row.author_last_name) {
            (Some(first), Some(last)) => Some(super::author::display_name(first, last)),
            _ => None,
        };
        Self {
            id: row.id,
            title: row.title,
            author_id: row.author_id,
            author_name,
            display_genre: display_genre(&row.genre_names),
        }
    }
}

pub fn display_genre<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .take(DISPLAY_GENRE_COUNT)
        .map(|n| n.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Book with its relations and copies
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author: Option<Author>,
    pub language: Language,
    pub genres: Vec<Genre>,
    pub copies: Vec<CopyDetails>,
}

/// Create / update book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,
    pub author_id: Option<i32>,
    #[validate(length(max = 1000, message = "Summary must be at most 1000 characters"))]
    pub summary: String,
    #[validate(length(equal = 13, message = "ISBN must be 13 characters"))]
    pub isbn: String,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    pub language_id: i32,
}

/// Books tagged with a genre
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenreBooks {
    pub genre: Genre,
    pub books: Vec<BookSummary>,
}
