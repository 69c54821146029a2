//! HTTP handlers for the books module.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookshelf_http::AppError;

use super::models::{Book, BookId, BookPayload, MessageResponse};
use super::store::BookStore;

#[derive(Clone)]
struct BooksState {
    store: Arc<dyn BookStore>,
}

/// Routes relative to the module base path.
pub fn router(store: Arc<dyn BookStore>) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(BooksState { store })
}

fn book_id(path: Result<Path<BookId>, PathRejection>) -> Result<BookId, AppError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        tracing::warn!(error = %rejection, "invalid book id");
        AppError::bad_request("Invalid book ID")
    })
}

async fn create_book(
    State(state): State<BooksState>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(payload) = payload?;
    let new_book = payload.validate()?;

    let book = state.store.create(new_book).await?;

    tracing::info!(book_id = book.id, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

async fn list_books(State(state): State<BooksState>) -> Result<Json<Vec<Book>>, AppError> {
    let books = state.store.list().await?;

    tracing::info!(count = books.len(), "listed books");
    Ok(Json(books))
}

async fn get_book(
    State(state): State<BooksState>,
    id: Result<Path<BookId>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let id = book_id(id)?;
    let book = state.store.get(id).await?;

    tracing::info!(book_id = id, "retrieved book");
    Ok(Json(book))
}

async fn update_book(
    State(state): State<BooksState>,
    id: Result<Path<BookId>, PathRejection>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = book_id(id)?;
    let Json(payload) = payload?;
    let changes = payload.validate()?;

    state.store.update(id, changes).await?;

    tracing::info!(book_id = id, "book updated");
    Ok(Json(MessageResponse::new("Book updated successfully")))
}

async fn delete_book(
    State(state): State<BooksState>,
    id: Result<Path<BookId>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = book_id(id)?;

    state.store.delete(id).await?;

    tracing::info!(book_id = id, "book deleted");
    Ok(Json(MessageResponse::new("Book deleted successfully")))
}
