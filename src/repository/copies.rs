//! Book copies repository and the copy store used by circulation

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    circulation::LoanState,
    error::{AppError, AppResult},
    models::copy::{BookCopy, CopyRow, CopyStatus, CreateCopy},
};

const COPY_COLUMNS: &str = "id, book_id, imprint, due_back, borrower_id, status";

/// Copy joined with its book title; `c` is book_copies, `b` is books
const COPY_ROW_SELECT: &str = r#"
    SELECT c.id, c.book_id, c.imprint, c.due_back, c.borrower_id, c.status,
           b.title AS book_title
    FROM book_copies c
    JOIN books b ON b.id = c.book_id
"#;

/// Persistence operations the loan state machine relies on.
///
/// Every state change goes through [`CopyStore::compare_and_set`], which only
/// applies when the stored loan columns still equal `expected`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CopyStore: Send + Sync {
    /// Fetch a copy, `NotFound` if the id does not resolve
    async fn get_copy(&self, id: Uuid) -> AppResult<BookCopy>;

    /// Write `next` if the copy's loan columns still match `expected`.
    /// Returns `None` when no row matched.
    async fn compare_and_set(
        &self,
        id: Uuid,
        expected: LoanState,
        next: LoanState,
    ) -> AppResult<Option<BookCopy>>;

    async fn borrower_exists(&self, user_id: i32) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct CopiesRepository {
    pool: Pool<Postgres>,
}

impl CopiesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a copy with a freshly generated id
    pub async fn create(&self, book_id: i32, data: &CreateCopy) -> AppResult<BookCopy> {
        let copy = sqlx::query_as::<_, BookCopy>(&format!(
            r#"
            INSERT INTO book_copies (id, book_id, imprint, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            COPY_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(book_id)
        .bind(&data.imprint)
        .bind(data.status.unwrap_or_default())
        .fetch_one(&self.pool)
        .await?;
        Ok(copy)
    }

    /// Copy with its book title
    pub async fn get_row(&self, id: Uuid) -> AppResult<CopyRow> {
        sqlx::query_as::<_, CopyRow>(&format!("{} WHERE c.id = $1", COPY_ROW_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Copy {} not found", id)))
    }

    /// Copies of a book, ordered by due-back date
    pub async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<CopyRow>> {
        let rows = sqlx::query_as::<_, CopyRow>(&format!(
            "{} WHERE c.book_id = $1 ORDER BY c.due_back, c.id",
            COPY_ROW_SELECT
        ))
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Copies on loan, optionally only those of one borrower, ordered by due-back date
    pub async fn list_on_loan(
        &self,
        borrower_id: Option<i32>,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<CopyRow>> {
        let rows = sqlx::query_as::<_, CopyRow>(&format!(
            r#"
            {}
            WHERE c.status = $1
              AND ($2::int IS NULL OR c.borrower_id = $2)
            ORDER BY c.due_back, b.title, c.id
            LIMIT $3 OFFSET $4
            "#,
            COPY_ROW_SELECT
        ))
        .bind(CopyStatus::OnLoan)
        .bind(borrower_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_on_loan(&self, borrower_id: Option<i32>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_copies WHERE status = $1 AND ($2::int IS NULL OR borrower_id = $2)",
        )
        .bind(CopyStatus::OnLoan)
        .bind(borrower_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_copies")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_by_status(&self, status: CopyStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_copies WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl CopyStore for CopiesRepository {
    async fn get_copy(&self, id: Uuid) -> AppResult<BookCopy> {
        sqlx::query_as::<_, BookCopy>(&format!(
            "SELECT {} FROM book_copies WHERE id = $1",
            COPY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Copy {} not found", id)))
    }

    async fn compare_and_set(
        &self,
        id: Uuid,
        expected: LoanState,
        next: LoanState,
    ) -> AppResult<Option<BookCopy>> {
        let copy = sqlx::query_as::<_, BookCopy>(&format!(
            r#"
            UPDATE book_copies
            SET status = $1, due_back = $2, borrower_id = $3
            WHERE id = $4
              AND status = $5
              AND due_back IS NOT DISTINCT FROM $6
              AND borrower_id IS NOT DISTINCT FROM $7
            RETURNING {}
            "#,
            COPY_COLUMNS
        ))
        .bind(next.status)
        .bind(next.due_back)
        .bind(next.borrower_id)
        .bind(id)
        .bind(expected.status)
        .bind(expected.due_back)
        .bind(expected.borrower_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(copy)
    }

    async fn borrower_exists(&self, user_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}
