//! Typed error definitions for Quoteoff.
//!
//! This module provides a structured error hierarchy with specific error
//! types for the store seam and the voting core. All errors are designed
//! to be:
//!
//! - **Serializable** for API responses via serde
//! - **Displayable** for logging via Display trait
//! - **Matchable** for error handling logic via enum variants
//! - **Composable** via thiserror derive macros

mod store;
mod vote;

pub use store::StoreError;
pub use vote::VoteError;

/// Standard Result type for voting operations.
pub type VoteResult<T> = std::result::Result<T, VoteError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = VoteError::Store(StoreError::Unavailable {
            message: "connection reset".to_string(),
        });

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("Store"));
        assert!(json.contains("connection reset"));

        let deserialized: VoteError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, deserialized);
    }

    #[test]
    fn test_error_display() {
        let err = VoteError::SamplerExhausted { attempts: 5 };
        let msg = format!("{}", err);
        assert!(msg.contains('5'));

        let err = StoreError::NotFound { doc_key: "q-42".to_string() };
        assert!(format!("{}", err).contains("q-42"));
    }
}
