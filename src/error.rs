//! Error types and handling.

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input rejected locally before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// One or more requests of a bulk update failed
    #[error("Bulk update failed: {failed} of {total} updates were rejected")]
    BulkUpdate { failed: usize, total: usize },
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create a validation error with message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an API error from a status code and body text
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// True when the error was raised locally by input validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_update_message() {
        let err = AppError::BulkUpdate { failed: 2, total: 5 };
        assert_eq!(err.to_string(), "Bulk update failed: 2 of 5 updates were rejected");
        assert!(!err.is_validation());
    }

    #[test]
    fn test_api_error_message() {
        assert_eq!(AppError::api(409, "Record locked").to_string(), "API error (409): Record locked");
        assert!(AppError::validation("empty").is_validation());
    }
}
