//! Copy service: creation, lookup and loan listings

use chrono::NaiveDate;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        copy::{BookCopy, CopyDetails, CreateCopy},
        CopyStatus, Page, PageQuery, PAGE_SIZE,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CopiesService {
    repository: Repository,
}

impl CopiesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a copy to a book. Copies start outside circulation or available;
    /// lending goes through the loans service.
    pub async fn create(&self, book_id: i32, data: CreateCopy) -> AppResult<BookCopy> {
        data.validate()?;
        if data.status == Some(CopyStatus::OnLoan) {
            return Err(AppError::Validation(
                "A new copy cannot start on loan, lend it once created".to_string(),
            ));
        }

        self.repository.books.get_by_id(book_id).await?;
        let copy = self.repository.copies.create(book_id, &data).await?;
        tracing::info!(copy_id = %copy.id, book_id, "Copy created");
        Ok(copy)
    }

    pub async fn get(&self, id: Uuid, today: NaiveDate) -> AppResult<CopyDetails> {
        let row = self.repository.copies.get_row(id).await?;
        Ok(CopyDetails::from_row(row, today))
    }

    /// Copies on loan to one borrower, by due-back date
    pub async fn borrowed_by(
        &self,
        borrower_id: i32,
        query: PageQuery,
        today: NaiveDate,
    ) -> AppResult<Page<CopyDetails>> {
        self.on_loan(Some(borrower_id), query, today).await
    }

    /// Every copy on loan, by due-back date
    pub async fn all_on_loan(&self, query: PageQuery, today: NaiveDate) -> AppResult<Page<CopyDetails>> {
        self.on_loan(None, query, today).await
    }

    async fn on_loan(
        &self,
        borrower_id: Option<i32>,
        query: PageQuery,
        today: NaiveDate,
    ) -> AppResult<Page<CopyDetails>> {
        let rows = self
            .repository
            .copies
            .list_on_loan(borrower_id, PAGE_SIZE, query.offset())
            .await?;
        let total = self.repository.copies.count_on_loan(borrower_id).await?;
        let items = rows
            .into_iter()
            .map(|row| CopyDetails::from_row(row, today))
            .collect();
        Ok(Page::new(items, total, query))
    }
}
