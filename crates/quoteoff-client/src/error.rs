//! Error types for the Firestore client.

use quoteoff_types::StoreError;
use thiserror::Error;

/// Errors that can occur when talking to the Firestore REST API.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an invalid or unparseable response.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Server returned 429 Too Many Requests.
    #[error("Rate limited (429): retry after {retry_after:?}s")]
    RateLimited {
        /// Seconds to wait before retrying, if provided by server.
        retry_after: Option<u64>,
    },

    /// Server returned a non-success status.
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Error message from server.
        message: String,
    },

    /// Request still failing after the retry budget.
    #[error("Gave up after {attempts} attempts")]
    RetriesExhausted {
        /// Attempts made, including the first.
        attempts: usize,
    },
}

impl ClientError {
    /// Map onto the store-seam error the core understands. Missing-record
    /// statuses need the record key for context, so `update_fields` maps
    /// those itself before falling back to this.
    pub fn into_store_error(self) -> StoreError {
        match self {
            ClientError::InvalidResponse(message) => StoreError::Malformed { message },
            other => StoreError::Unavailable { message: other.to_string() },
        }
    }
}
