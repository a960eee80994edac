//! Domain models for the voting system.

use serde::{Deserialize, Serialize};

/// A stored quote record.
///
/// The `doc_key` is the store's own record key and is distinct from
/// `quote_id`, the semantic identifier drawn during random sampling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quote {
    /// Record key assigned by the store backend. Not part of the stored
    /// fields; backends fill it in when decoding a record.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub doc_key: String,

    /// Sampling identifier, assigned at creation. The id space may contain
    /// gaps: an identifier with no backing record.
    #[serde(rename = "id")]
    pub quote_id: u32,

    /// Opaque text payload, immutable after creation.
    #[serde(rename = "displayText")]
    pub display_text: String,

    /// Elo skill score. Records written before ratings existed have no
    /// rating field and decode to the starting value.
    #[serde(default = "default_rating")]
    pub rating: i64,

    /// Number of comparisons this quote has won.
    #[serde(rename = "voteCount", default)]
    pub vote_count: u64,
}

/// Rating assigned to records that have never been compared.
pub const STARTING_RATING: i64 = 1000;

fn default_rating() -> i64 {
    STARTING_RATING
}

/// The two quotes currently offered for comparison.
///
/// Ephemeral: lives for one voting round and is replaced wholesale when the
/// next pair loads. The two sides are guaranteed distinct by `quote_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub left: Quote,
    pub right: Quote,
}
