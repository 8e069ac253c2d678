//! Data models for the catalog

pub mod author;
pub mod book;
pub mod copy;
pub mod genre;
pub mod language;
pub mod user;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// Re-export commonly used types
pub use author::{Author, AuthorDetails, AuthorInput};
pub use book::{Book, BookDetails, BookInput, BookSummary, GenreBooks};
pub use copy::{BookCopy, CopyDetails, CopyStatus};
pub use genre::Genre;
pub use language::Language;
pub use user::{Permission, UserClaims};

/// Rows per page for list views
pub const PAGE_SIZE: i64 = 10;

/// `?page=N` query, 1-based
#[derive(Debug, Default, Clone, Copy, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number (default: 1)
    pub page: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Row offset, saturating for absurd page numbers
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(PAGE_SIZE)
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    BookPage = Page<BookSummary>,
    AuthorPage = Page<Author>,
    CopyPage = Page<CopyDetails>
)]
pub struct Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub items: Vec<T>,
    /// Total number of rows
    pub total: i64,
    /// Current page number
    pub page: i64,
    pub per_page: i64,
    pub num_pages: i64,
}

impl<T> Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>, total: i64, query: PageQuery) -> Self {
        Self {
            items,
            total,
            page: query.page(),
            per_page: PAGE_SIZE,
            num_pages: ((total + PAGE_SIZE - 1) / PAGE_SIZE).max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_offsets() {
        assert_eq!(PageQuery { page: None }.offset(), 0);
        assert_eq!(PageQuery { page: Some(0) }.offset(), 0);
        assert_eq!(PageQuery { page: Some(3) }.offset(), 20);
        assert_eq!(PageQuery { page: Some(-5) }.offset(), 0);
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let query = PageQuery { page: Some(i64::MAX) };
        assert_eq!(query.page(), i64::MAX);
        assert_eq!(query.offset(), i64::MAX);
    }

    #[test]
    fn page_count_rounds_up() {
        let page = Page::<Genre>::new(vec![], 21, PageQuery { page: Some(2) });
        assert_eq!(page.num_pages, 3);
        assert_eq!(page.page, 2);
        assert_eq!(Page::<Genre>::new(vec![], 0, PageQuery::default()).num_pages, 1);
    }
}
