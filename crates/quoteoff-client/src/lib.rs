//! # Quoteoff Client
//!
//! Firestore REST backend for the Quoteoff voting core.
//!
//! [`FirestoreStore`] implements [`quoteoff_core::QuoteStore`] against the
//! Firestore v1 REST API: `runQuery` with a structured query for filtered
//! and ordered reads, `commit` with field transforms for atomic vote-count
//! increments. Transient HTTP failures (429, 5xx) are retried with
//! exponential backoff before surfacing as store errors.

mod client;
mod error;
mod types;

pub use client::FirestoreStore;
pub use error::ClientError;
pub use types::{FirestoreConfig, RetryConfig};

#[cfg(test)]
mod client_tests;
