//! Explicit input validation, independent of how the payload was decoded.

use bookshelf_http::AppError;
use serde_json::json;
use thiserror::Error;

/// A rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    pub fn required(field: &'static str) -> Self {
        Self::new(field, "is required")
    }
}

/// Require a present, non-blank string field.
pub fn require_text(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ValidationError::required(field)),
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(
            vec![json!({ "field": err.field, "error": err.reason })],
            err.to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_text_accepts_content() {
        assert_eq!(
            require_text("title", Some("Dune".to_string())),
            Ok("Dune".to_string())
        );
    }

    #[test]
    fn require_text_rejects_missing_and_blank() {
        assert_eq!(
            require_text("title", None),
            Err(ValidationError::required("title"))
        );
        assert_eq!(
            require_text("author", Some("   ".to_string())).unwrap_err().field,
            "author"
        );
    }

    #[test]
    fn message_names_the_field() {
        assert_eq!(ValidationError::required("url").to_string(), "url is required");
    }
}
