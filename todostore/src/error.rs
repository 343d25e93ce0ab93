//! Store error types

use thiserror::Error;

/// Errors from store operations
///
/// The `Display` text is what the API layer surfaces to callers.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Store is not running")]
    ChannelClosed,
}

impl StoreError {
    /// Check if a read that failed with this error may be retried
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Api { status, .. } => is_retryable_status(*status),
            StoreError::Network(_) => true,
            StoreError::Sqlite(_) => false,
            StoreError::Io(_) => false,
            StoreError::InvalidRecord(_) => false,
            StoreError::ChannelClosed => false,
        }
    }
}

/// Check if an HTTP status code is retryable
pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_message_verbatim() {
        let err = StoreError::Api {
            status: 400,
            message: "null value in column \"title\" violates not-null constraint".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "null value in column \"title\" violates not-null constraint"
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(
            StoreError::Api {
                status: 503,
                message: "unavailable".to_string()
            }
            .is_retryable()
        );
        assert!(
            !StoreError::Api {
                status: 404,
                message: "relation does not exist".to_string()
            }
            .is_retryable()
        );
        assert!(!StoreError::InvalidRecord("bad".to_string()).is_retryable());
        assert!(!StoreError::ChannelClosed.is_retryable());
    }
}
