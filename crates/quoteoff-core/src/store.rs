//! Document store seam.
//!
//! The core never talks to a concrete backend; it operates against
//! [`QuoteStore`], which any document store with equality filters, ordered
//! queries, and atomic partial updates can implement.

use async_trait::async_trait;
use quoteoff_types::{Quote, StoreError};

/// Stored field holding the sampling identifier.
pub const QUOTE_ID_FIELD: &str = "id";
/// Stored field holding the Elo rating.
pub const RATING_FIELD: &str = "rating";
/// Stored field holding the win counter.
pub const VOTE_COUNT_FIELD: &str = "voteCount";
/// Stored field holding the quote text.
pub const DISPLAY_TEXT_FIELD: &str = "displayText";

pub type StoreResult<T> = Result<T, StoreError>;

/// Sort order for [`QuoteStore::query_ordered`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One field change inside a partial update.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    pub field: String,
    pub op: FieldOp,
}

/// The operation applied to a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    /// Replace the field value wholesale.
    Set(serde_json::Value),
    /// Add to the current value atomically on the backend.
    Increment(i64),
}

impl FieldUpdate {
    pub fn set(field: &str, value: impl Into<serde_json::Value>) -> Self {
        Self { field: field.to_string(), op: FieldOp::Set(value.into()) }
    }

    pub fn increment(field: &str, amount: i64) -> Self {
        Self { field: field.to_string(), op: FieldOp::Increment(amount) }
    }
}

/// Backend-agnostic access to the quote collection.
///
/// The collection itself is construction state of the implementing store;
/// callers address records only by field values and record keys.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Records whose `field` equals `value`, capped at `limit`.
    async fn query_by_field(&self, field: &str, value: i64, limit: usize)
        -> StoreResult<Vec<Quote>>;

    /// Records ordered by `field`, capped at `limit`.
    async fn query_ordered(
        &self,
        field: &str,
        direction: SortDirection,
        limit: usize,
    ) -> StoreResult<Vec<Quote>>;

    /// Partial update of one record. `Set` and `Increment` operations in
    /// the same batch commit together.
    async fn update_fields(&self, doc_key: &str, updates: &[FieldUpdate]) -> StoreResult<()>;
}
