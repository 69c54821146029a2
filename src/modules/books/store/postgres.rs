use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use time::OffsetDateTime;

use super::{BookStore, Result, StoreError};
use crate::modules::books::models::{Book, BookId, NewBook};

const CREATE_BOOKS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS books (
        id SERIAL PRIMARY KEY,
        title VARCHAR(255) NOT NULL,
        author VARCHAR(255) NOT NULL,
        year INT,
        created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
    )
"#;

/// PostgreSQL implementation of the book store.
///
/// Statements run directly on the pool without explicit transactions.
#[derive(Debug, Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    /// Creates a store from an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StoreError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_) => StoreError::InvalidData(message),
        _ => StoreError::Query(message),
    }
}

fn book_from_row(row: &PgRow) -> Result<Book> {
    let created_at: Option<OffsetDateTime> = row.try_get("created_at").map_err(map_sqlx_error)?;

    Ok(Book {
        id: row.try_get("id").map_err(map_sqlx_error)?,
        title: row.try_get("title").map_err(map_sqlx_error)?,
        author: row.try_get("author").map_err(map_sqlx_error)?,
        year: row.try_get("year").map_err(map_sqlx_error)?,
        created_at: created_at.ok_or_else(|| {
            StoreError::InvalidData("book row is missing created_at".to_string())
        })?,
    })
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_BOOKS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        tracing::info!("books table migrated successfully");
        Ok(())
    }

    async fn create(&self, book: NewBook) -> Result<Book> {
        let row = sqlx::query(
            r#"
            INSERT INTO books (title, author, year)
            VALUES ($1, $2, $3)
            RETURNING id, created_at
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.year)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let id: BookId = row.try_get("id").map_err(map_sqlx_error)?;
        let created_at: Option<OffsetDateTime> =
            row.try_get("created_at").map_err(map_sqlx_error)?;

        Ok(Book {
            id,
            title: book.title,
            author: book.author,
            year: book.year,
            created_at: created_at.ok_or_else(|| {
                StoreError::InvalidData(format!("book {id} was created without created_at"))
            })?,
        })
    }

    async fn list(&self) -> Result<Vec<Book>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, author, COALESCE(year, 0) AS year, created_at
            FROM books
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(book_from_row).collect()
    }

    async fn get(&self, id: BookId) -> Result<Book> {
        let row = sqlx::query(
            r#"
            SELECT id, title, author, COALESCE(year, 0) AS year, created_at
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Err(StoreError::NotFound(id));
        };

        book_from_row(&row)
    }

    async fn update(&self, id: BookId, book: NewBook) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $1, author = $2, year = $3
            WHERE id = $4
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.year)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: BookId) -> Result<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
