//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookInput, BookSummaryRow, DISPLAY_GENRE_COUNT},
};

const BOOK_COLUMNS: &str = "id, title, author_id, summary, isbn, language_id";

/// Listing columns; `b` is books, `a` is the (optional) author
fn summary_select() -> String {
    format!(
        r#"
        SELECT b.id, b.title, b.author_id,
               a.first_name AS author_first_name,
               a.last_name AS author_last_name,
               ARRAY(
                   SELECT g.name::text
                   FROM book_genres bg
                   JOIN genres g ON g.id = bg.genre_id
                   WHERE bg.book_id = b.id
                   ORDER BY g.name
                   LIMIT {}
               ) AS genre_names
        FROM books b
        LEFT JOIN authors a ON a.id = b.author_id
        "#,
        DISPLAY_GENRE_COUNT
    )
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// One page of books ordered by title
    pub async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<BookSummaryRow>> {
        let rows = sqlx::query_as::<_, BookSummaryRow>(&format!(
            "{} ORDER BY b.title, b.id LIMIT $1 OFFSET $2",
            summary_select()
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Books tagged with a genre, ordered by title
    pub async fn list_by_genre(&self, genre_id: i32) -> AppResult<Vec<BookSummaryRow>> {
        let rows = sqlx::query_as::<_, BookSummaryRow>(&format!(
            r#"
            {}
            WHERE EXISTS (
                SELECT 1 FROM book_genres bg2
                WHERE bg2.book_id = b.id AND bg2.genre_id = $1
            )
            ORDER BY b.title, b.id
            "#,
            summary_select()
        ))
        .bind(genre_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Books written by an author, ordered by title
    pub async fn list_by_author(&self, author_id: i32) -> AppResult<Vec<BookSummaryRow>> {
        let rows = sqlx::query_as::<_, BookSummaryRow>(&format!(
            "{} WHERE b.author_id = $1 ORDER BY b.title, b.id",
            summary_select()
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Insert a book and its genre links in one transaction
    pub async fn create(&self, data: &BookInput) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author_id, summary, isbn, language_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&data.title)
        .bind(data.author_id)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(data.language_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO book_genres (book_id, genre_id) SELECT $1, UNNEST($2::int[])")
            .bind(book.id)
            .bind(&data.genre_ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(book)
    }

    /// Replace a book's fields and genre links in one transaction
    pub async fn update(&self, id: i32, data: &BookInput) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = $1, author_id = $2, summary = $3, isbn = $4, language_id = $5
            WHERE id = $6
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&data.title)
        .bind(data.author_id)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(data.language_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO book_genres (book_id, genre_id) SELECT $1, UNNEST($2::int[])")
            .bind(id)
            .bind(&data.genre_ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(book)
    }

    /// Delete a book; its copies and genre links go with it
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }
}
