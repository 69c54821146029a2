use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::utils::validation::{require_text, ValidationError};

/// Server-assigned book identifier.
pub type BookId = i32;

/// A stored book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// Publication year, `0` when unknown.
    pub year: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Validated fields written by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i32,
}

/// Request body for `POST /books` and `PUT /books/{id}`.
///
/// Fields are optional here so that presence is checked by [`BookPayload::validate`]
/// rather than by the decoder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl BookPayload {
    pub fn validate(self) -> Result<NewBook, ValidationError> {
        Ok(NewBook {
            title: require_text("title", self.title)?,
            author: require_text("author", self.author)?,
            year: self.year.unwrap_or(0),
        })
    }
}

/// Confirmation returned by update and delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_defaults_to_zero() {
        let payload: BookPayload =
            serde_json::from_str(r#"{"title": "Dune", "author": "Frank Herbert"}"#).unwrap();
        let book = payload.validate().unwrap();
        assert_eq!(book.year, 0);
        assert_eq!(book.title, "Dune");
    }

    #[test]
    fn missing_author_names_the_field() {
        let payload: BookPayload = serde_json::from_str(r#"{"title": "Dune"}"#).unwrap();
        assert_eq!(payload.validate().unwrap_err().field, "author");
    }

    #[test]
    fn created_at_serializes_as_rfc3339() {
        let book = Book {
            id: 7,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            year: 1965,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["created_at"], "1970-01-01T00:00:00Z");
        assert_eq!(value["id"], 7);
    }
}
