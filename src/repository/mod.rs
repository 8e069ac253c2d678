//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod copies;
pub mod genres;
pub mod languages;
pub mod users;

use sqlx::{Pool, Postgres};

pub use copies::CopyStore;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub authors: authors::AuthorsRepository,
    pub books: books::BooksRepository,
    pub copies: copies::CopiesRepository,
    pub genres: genres::GenresRepository,
    pub languages: languages::LanguagesRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: authors::AuthorsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            copies: copies::CopiesRepository::new(pool.clone()),
            genres: genres::GenresRepository::new(pool.clone()),
            languages: languages::LanguagesRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database, used by the readiness probe
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
