//! Persistence boundary for books.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryBookStore;
pub use postgres::PgBookStore;

use async_trait::async_trait;
use bookshelf_http::AppError;
use thiserror::Error;

use super::models::{Book, BookId, NewBook};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("book {0} not found")]
    NotFound(BookId),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage query failed: {0}")]
    Query(String),
}

/// CRUD access to the book table.
///
/// Every call is a single statement; no call retries.
#[async_trait]
pub trait BookStore: Send + Sync + 'static {
    /// Create the backing table if it does not exist yet.
    async fn ensure_schema(&self) -> Result<()>;

    /// Insert a book, assigning its id and creation timestamp.
    async fn create(&self, book: NewBook) -> Result<Book>;

    /// All books ordered by id.
    async fn list(&self) -> Result<Vec<Book>>;

    async fn get(&self, id: BookId) -> Result<Book>;

    /// Overwrite title, author and year. `id` and `created_at` never change.
    async fn update(&self, id: BookId, book: NewBook) -> Result<()>;

    async fn delete(&self, id: BookId) -> Result<()>;
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::not_found("Book not found"),
            other => AppError::Internal(anyhow::Error::new(other).context("book store failure")),
        }
    }
}
