//! Store backend errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by a document store backend.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum StoreError {
    /// Backend could not be reached or refused the request
    #[error("Store unavailable: {message}")]
    Unavailable {
        /// Description of the transport or backend failure
        message: String,
    },

    /// No record exists under the given key
    #[error("Record not found: {doc_key}")]
    NotFound {
        /// Record key the operation targeted
        doc_key: String,
    },

    /// A record exists but could not be decoded
    #[error("Malformed record: {message}")]
    Malformed {
        /// Description of the decoding failure
        message: String,
    },
}

impl StoreError {
    /// Check if this is a temporary error that may resolve on retry.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
