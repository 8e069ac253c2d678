//! Library catalog server
//!
//! Tracks books, authors, genres, languages and individually tracked copies
//! that can be lent to users, renewed and marked returned, behind a REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod circulation;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
