//! Voting core errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::StoreError;

/// Errors that can occur while selecting pairs, recording votes, or
/// fetching the leaderboard.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum VoteError {
    /// No distinct pair could be selected within the attempt budget.
    /// Callers must show a user-visible error and stop automatic
    /// progression instead of retrying indefinitely.
    #[error("No pair available after {attempts} attempts")]
    SamplerExhausted {
        /// Pairing rounds spent before giving up
        attempts: u32,
    },

    /// A vote arrived while no pair was loaded
    #[error("No active pair to vote on")]
    NoActivePair,

    /// A rating write did not commit; the vote may be lost
    #[error("Vote failed to record: {message}")]
    UpdateFailed {
        /// Description of the write failure
        message: String,
    },

    /// A direct store operation failed outside the sampling retry loop
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl VoteError {
    /// Check if this is a temporary error that may resolve on retry.
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::SamplerExhausted { .. } | Self::UpdateFailed { .. } => true,
            Self::NoActivePair => false,
            Self::Store(e) => e.is_transient(),
        }
    }
}
