//! Languages repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::language::{CreateLanguage, Language},
};

#[derive(Clone)]
pub struct LanguagesRepository {
    pool: Pool<Postgres>,
}

impl LanguagesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Language>> {
        let languages =
            sqlx::query_as::<_, Language>("SELECT id, name FROM languages ORDER BY name, id")
                .fetch_all(&self.pool)
                .await?;
        Ok(languages)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Language> {
        sqlx::query_as::<_, Language>("SELECT id, name FROM languages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Language with id {} not found", id)))
    }

    pub async fn create(&self, data: &CreateLanguage) -> AppResult<Language> {
        let language = sqlx::query_as::<_, Language>(
            "INSERT INTO languages (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&data.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::on_unique_violation(e, format!("Language '{}' already exists", data.name)))?;
        Ok(language)
    }
}
