//! Borrower accounts mirrored from access tokens

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Record a token holder as a borrower. Existing rows are left untouched.
    pub async fn mirror(&self, id: i32, username: &str) -> AppResult<()> {
        sqlx::query("INSERT INTO users (id, username) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(id)
            .bind(username)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
