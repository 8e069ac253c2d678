//! Authors repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorInput},
};

const AUTHOR_COLUMNS: &str = "id, first_name, last_name, date_of_birth, date_of_death";

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// One page of authors ordered by (last name, first name)
    pub async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors ORDER BY last_name, first_name, id LIMIT $1 OFFSET $2",
            AUTHOR_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(authors)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(&format!("SELECT {} FROM authors WHERE id = $1", AUTHOR_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn create(&self, data: &AuthorInput) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>(&format!(
            r#"
            INSERT INTO authors (first_name, last_name, date_of_birth, date_of_death)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        ))
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(data.date_of_birth)
        .bind(data.date_of_death)
        .fetch_one(&self.pool)
        .await?;
        Ok(author)
    }

    pub async fn update(&self, id: i32, data: &AuthorInput) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(&format!(
            r#"
            UPDATE authors
            SET first_name = $1, last_name = $2, date_of_birth = $3, date_of_death = $4
            WHERE id = $5
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        ))
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(data.date_of_birth)
        .bind(data.date_of_death)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    /// Delete an author. Their books stay, with the author link cleared.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author with id {} not found", id)));
        }
        Ok(())
    }
}
