use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;

use super::{BookStore, Result, StoreError};
use crate::modules::books::models::{Book, BookId, NewBook};

/// In-memory book store backed by a DashMap.
///
/// Ids come from an atomic counter and are never reused, even after deletes.
#[derive(Debug)]
pub struct InMemoryBookStore {
    books: DashMap<BookId, Book>,
    next_id: AtomicI32,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
            next_id: AtomicI32::new(1),
        }
    }
}

impl Default for InMemoryBookStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn create(&self, book: NewBook) -> Result<Book> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = Book {
            id,
            title: book.title,
            author: book.author,
            year: book.year,
            created_at: OffsetDateTime::now_utc(),
        };
        self.books.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<Book>> {
        let mut books: Vec<Book> = self.books.iter().map(|entry| entry.value().clone()).collect();
        books.sort_by_key(|book| book.id);
        Ok(books)
    }

    async fn get(&self, id: BookId) -> Result<Book> {
        self.books
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, id: BookId, book: NewBook) -> Result<()> {
        let mut entry = self.books.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        entry.title = book.title;
        entry.author = book.author;
        entry.year = book.year;
        Ok(())
    }

    async fn delete(&self, id: BookId) -> Result<()> {
        self.books
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}
