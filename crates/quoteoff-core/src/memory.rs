//! In-memory store backend.
//!
//! Used by the test suites and by embedders that want the voting core
//! without a hosted database. Cheap to clone; clones share the same
//! underlying records.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use quoteoff_types::{Quote, StoreError};
use uuid::Uuid;

use crate::store::{
    FieldOp, FieldUpdate, QuoteStore, SortDirection, StoreResult, DISPLAY_TEXT_FIELD,
    QUOTE_ID_FIELD, RATING_FIELD, VOTE_COUNT_FIELD,
};

#[derive(Default)]
struct Inner {
    records: DashMap<String, Quote>,
    field_queries: AtomicU64,
    ordered_queries: AtomicU64,
    updates: AtomicU64,
    unavailable: AtomicBool,
}

/// A [`QuoteStore`] holding records in process memory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under a fresh doc key and return the key.
    pub fn seed(&self, quote_id: u32, display_text: &str, rating: i64) -> String {
        let doc_key = Uuid::new_v4().to_string();
        self.inner.records.insert(
            doc_key.clone(),
            Quote {
                doc_key: doc_key.clone(),
                quote_id,
                display_text: display_text.to_string(),
                rating,
                vote_count: 0,
            },
        );
        doc_key
    }

    pub fn get(&self, doc_key: &str) -> Option<Quote> {
        self.inner.records.get(doc_key).map(|r| r.clone())
    }

    pub fn len(&self) -> usize {
        self.inner.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.records.is_empty()
    }

    /// Make every subsequent operation fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Equality queries served so far, including failed ones.
    pub fn field_query_count(&self) -> u64 {
        self.inner.field_queries.load(Ordering::SeqCst)
    }

    /// Ordered queries served so far, including failed ones.
    pub fn ordered_query_count(&self) -> u64 {
        self.inner.ordered_queries.load(Ordering::SeqCst)
    }

    /// Partial updates attempted so far.
    pub fn update_count(&self) -> u64 {
        self.inner.updates.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                message: "memory store marked unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn numeric_field(quote: &Quote, field: &str) -> StoreResult<i64> {
        match field {
            QUOTE_ID_FIELD => Ok(i64::from(quote.quote_id)),
            RATING_FIELD => Ok(quote.rating),
            VOTE_COUNT_FIELD => Ok(quote.vote_count as i64),
            other => Err(StoreError::Malformed {
                message: format!("unknown numeric field: {other}"),
            }),
        }
    }
}

#[async_trait]
impl QuoteStore for MemoryStore {
    async fn query_by_field(
        &self,
        field: &str,
        value: i64,
        limit: usize,
    ) -> StoreResult<Vec<Quote>> {
        self.inner.field_queries.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut matches = Vec::new();
        for entry in self.inner.records.iter() {
            if Self::numeric_field(entry.value(), field)? == value {
                matches.push(entry.value().clone());
                if matches.len() >= limit {
                    break;
                }
            }
        }
        Ok(matches)
    }

    async fn query_ordered(
        &self,
        field: &str,
        direction: SortDirection,
        limit: usize,
    ) -> StoreResult<Vec<Quote>> {
        self.inner.ordered_queries.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut records: Vec<Quote> =
            self.inner.records.iter().map(|entry| entry.value().clone()).collect();
        for record in &records {
            Self::numeric_field(record, field)?;
        }
        records.sort_by_key(|r| {
            let key = Self::numeric_field(r, field).unwrap_or_default();
            match direction {
                SortDirection::Ascending => key,
                SortDirection::Descending => -key,
            }
        });
        records.truncate(limit);
        Ok(records)
    }

    async fn update_fields(&self, doc_key: &str, updates: &[FieldUpdate]) -> StoreResult<()> {
        self.inner.updates.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut record = self
            .inner
            .records
            .get_mut(doc_key)
            .ok_or_else(|| StoreError::NotFound { doc_key: doc_key.to_string() })?;

        for update in updates {
            match (&update.op, update.field.as_str()) {
                (FieldOp::Set(value), RATING_FIELD) => {
                    record.rating = value.as_i64().ok_or_else(|| StoreError::Malformed {
                        message: format!("non-integer rating: {value}"),
                    })?;
                }
                (FieldOp::Set(value), DISPLAY_TEXT_FIELD) => {
                    record.display_text = value
                        .as_str()
                        .ok_or_else(|| StoreError::Malformed {
                            message: format!("non-string displayText: {value}"),
                        })?
                        .to_string();
                }
                (FieldOp::Increment(amount), VOTE_COUNT_FIELD) => {
                    record.vote_count = record.vote_count.saturating_add_signed(*amount);
                }
                (FieldOp::Increment(amount), RATING_FIELD) => {
                    record.rating += amount;
                }
                (op, field) => {
                    return Err(StoreError::Malformed {
                        message: format!("unsupported update {op:?} on field {field}"),
                    });
                }
            }
        }
        Ok(())
    }
}
