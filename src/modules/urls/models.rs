use serde::{Deserialize, Serialize};

use super::normalize::UrlOperation;
use crate::utils::validation::{require_text, ValidationError};

/// Request body for `POST /process-url`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessUrlRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub operation: Option<String>,
}

/// A request whose fields are present and whose operation is recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProcessUrl {
    pub url: String,
    pub operation: UrlOperation,
}

impl ProcessUrlRequest {
    pub fn validate(self) -> Result<ValidatedProcessUrl, ValidationError> {
        let url = require_text("url", self.url)?;
        let operation = require_text("operation", self.operation)?
            .parse::<UrlOperation>()
            .map_err(|_| {
                ValidationError::new("operation", "must be one of canonical, redirection, all")
            })?;

        Ok(ValidatedProcessUrl { url, operation })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessUrlResponse {
    pub processed_url: String,
}
