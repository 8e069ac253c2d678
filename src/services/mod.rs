//! Business logic services

pub mod authors;
pub mod catalog;
pub mod copies;
pub mod loans;

use std::sync::Arc;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub authors: authors::AuthorsService,
    pub catalog: catalog::CatalogService,
    pub copies: copies::CopiesService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            copies: copies::CopiesService::new(repository.clone()),
            loans: loans::LoansService::new(Arc::new(repository.copies.clone())),
            repository,
        }
    }
}
