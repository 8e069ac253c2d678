//! Author management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorDetails, AuthorInput},
        Page, PageQuery, PAGE_SIZE,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Authors ordered by (last name, first name)
    pub async fn list(&self, query: PageQuery) -> AppResult<Page<Author>> {
        let authors = self.repository.authors.list(PAGE_SIZE, query.offset()).await?;
        let total = self.repository.authors.count().await?;
        Ok(Page::new(authors, total, query))
    }

    pub async fn get(&self, id: i32) -> AppResult<AuthorDetails> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self
            .repository
            .books
            .list_by_author(id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(AuthorDetails {
            display_name: author.display_name(),
            author,
            books,
        })
    }

    pub async fn create(&self, data: AuthorInput) -> AppResult<Author> {
        data.validate()?;
        let author = self.repository.authors.create(&data).await?;
        tracing::info!(author_id = author.id, name = %author.display_name(), "Author created");
        Ok(author)
    }

    pub async fn update(&self, id: i32, data: AuthorInput) -> AppResult<Author> {
        data.validate()?;
        self.repository.authors.update(id, &data).await
    }

    /// Delete an author; their books remain without an author
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await?;
        tracing::info!(author_id = id, "Author deleted");
        Ok(())
    }
}
