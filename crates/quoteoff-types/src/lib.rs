//! # Quoteoff Types
//!
//! Core types, models, and error definitions for the Quoteoff voting system.
//!
//! This crate provides the foundational type system for the Quoteoff crates:
//!
//! - **`error`** - Typed error hierarchy for store backends and voting logic
//! - **`models`** - Domain models (Quote, Pair)
//! - **`config`** - Configuration types with serde defaults
//!
//! ## Architecture Role
//!
//! `quoteoff-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!        quoteoff-types (this crate)
//!                │
//!                ▼
//!         quoteoff-core
//!                │
//!                ▼
//!        quoteoff-client
//! ```
//!
//! All types are designed to be:
//! - **Serializable** via serde for API/IPC
//! - **Clone** for cheap sharing across async boundaries
//! - **PartialEq** for testing and comparison

pub mod config;
pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::{StoreError, VoteError, VoteResult};

// Re-export core model and config types
pub use config::{EloConfig, LeaderboardConfig, SamplerConfig, VoteConfig};
pub use models::{Pair, Quote, STARTING_RATING};
