//! Genres repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::genre::{CreateGenre, Genre},
};

#[derive(Clone)]
pub struct GenresRepository {
    pool: Pool<Postgres>,
}

impl GenresRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// All genres ordered by name
    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(genres)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Genre> {
        sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Genre with id {} not found", id)))
    }

    /// Genres of a book, ordered by name
    pub async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM genres g
            JOIN book_genres bg ON bg.genre_id = g.id
            WHERE bg.book_id = $1
            ORDER BY g.name, g.id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(genres)
    }

    /// Number of the given (distinct) ids that exist
    pub async fn count_existing(&self, ids: &[i32]) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres WHERE id = ANY($1)")
            .bind(ids)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn create(&self, data: &CreateGenre) -> AppResult<Genre> {
        let genre = sqlx::query_as::<_, Genre>(
            "INSERT INTO genres (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&data.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::on_unique_violation(e, format!("Genre '{}' already exists", data.name)))?;
        Ok(genre)
    }
}
