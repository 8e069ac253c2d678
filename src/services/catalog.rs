//! Catalog service: books, genres, languages and the catalog summary

use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookDetails, BookInput, BookSummary, GenreBooks},
        copy::CopyDetails,
        genre::{CreateGenre, Genre},
        language::{CreateLanguage, Language},
        Book, CopyStatus, Page, PageQuery, PAGE_SIZE,
    },
    repository::Repository,
};

/// Counts shown on the catalog home page
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogSummary {
    pub num_books: i64,
    pub num_copies: i64,
    pub num_copies_available: i64,
    pub num_authors: i64,
    pub genres: Vec<Genre>,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn summary(&self) -> AppResult<CatalogSummary> {
        Ok(CatalogSummary {
            num_books: self.repository.books.count().await?,
            num_copies: self.repository.copies.count().await?,
            num_copies_available: self
                .repository
                .copies
                .count_by_status(CopyStatus::Available)
                .await?,
            num_authors: self.repository.authors.count().await?,
            genres: self.repository.genres.list().await?,
        })
    }

    /// Books ordered by title, one page at a time
    pub async fn list_books(&self, query: PageQuery) -> AppResult<Page<BookSummary>> {
        let rows = self.repository.books.list(PAGE_SIZE, query.offset()).await?;
        let total = self.repository.books.count().await?;
        Ok(Page::new(rows.into_iter().map(Into::into).collect(), total, query))
    }

    pub async fn get_book(&self, id: i32, today: chrono::NaiveDate) -> AppResult<BookDetails> {
        let book = self.repository.books.get_by_id(id).await?;

        let author = match book.author_id {
            Some(author_id) => Some(self.repository.authors.get_by_id(author_id).await?),
            None => None,
        };
        let language = self.repository.languages.get_by_id(book.language_id).await?;
        let genres = self.repository.genres.list_for_book(id).await?;
        let copies = self
            .repository
            .copies
            .list_for_book(id)
            .await?
            .into_iter()
            .map(|row| CopyDetails::from_row(row, today))
            .collect();

        Ok(BookDetails {
            id: book.id,
            title: book.title,
            summary: book.summary,
            isbn: book.isbn,
            author,
            language,
            genres,
            copies,
        })
    }

    /// A genre and the books tagged with it
    pub async fn books_by_genre(&self, genre_id: i32) -> AppResult<GenreBooks> {
        let genre = self.repository.genres.get_by_id(genre_id).await?;
        let books = self
            .repository
            .books
            .list_by_genre(genre_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(GenreBooks { genre, books })
    }

    pub async fn create_book(&self, mut data: BookInput) -> AppResult<Book> {
        data.validate()?;
        normalize_genre_ids(&mut data.genre_ids);
        self.check_references(&data).await?;

        let book = self.repository.books.create(&data).await?;
        tracing::info!(book_id = book.id, title = %book.title, "Book created");
        Ok(book)
    }

    pub async fn update_book(&self, id: i32, mut data: BookInput) -> AppResult<Book> {
        data.validate()?;
        normalize_genre_ids(&mut data.genre_ids);
        self.check_references(&data).await?;

        self.repository.books.update(id, &data).await
    }

    /// Delete a book and, with it, all of its copies
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn create_genre(&self, data: CreateGenre) -> AppResult<Genre> {
        data.validate()?;
        self.repository.genres.create(&data).await
    }

    pub async fn list_languages(&self) -> AppResult<Vec<Language>> {
        self.repository.languages.list().await
    }

    pub async fn create_language(&self, data: CreateLanguage) -> AppResult<Language> {
        data.validate()?;
        self.repository.languages.create(&data).await
    }

    /// Language, author and genres named by a book payload must exist
    async fn check_references(&self, data: &BookInput) -> AppResult<()> {
        self.repository.languages.get_by_id(data.language_id).await?;

        if let Some(author_id) = data.author_id {
            if !self.repository.authors.exists(author_id).await? {
                return Err(AppError::NotFound(format!("Author with id {} not found", author_id)));
            }
        }

        if !data.genre_ids.is_empty() {
            let found = self.repository.genres.count_existing(&data.genre_ids).await?;
            if found != data.genre_ids.len() as i64 {
                return Err(AppError::NotFound("One or more genres not found".to_string()));
            }
        }

        Ok(())
    }
}

fn normalize_genre_ids(ids: &mut Vec<i32>) {
    ids.sort_unstable();
    ids.dedup();
}
