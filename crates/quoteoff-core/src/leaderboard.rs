//! TTL-cached leaderboard.

use std::time::Instant;

use chrono::{DateTime, Utc};
use quoteoff_types::{LeaderboardConfig, Quote, VoteResult};

use crate::store::{QuoteStore, SortDirection, RATING_FIELD};

/// One fetched leaderboard: top records by descending rating.
#[derive(Debug, Clone)]
pub struct LeaderboardSnapshot {
    pub entries: Vec<Quote>,
    /// Wall-clock capture time, for display.
    pub captured_at: DateTime<Utc>,
    /// Monotonic fetch time, drives TTL expiry.
    fetched_at: Instant,
}

impl LeaderboardSnapshot {
    pub fn age(&self, now: Instant) -> std::time::Duration {
        now.duration_since(self.fetched_at)
    }
}

/// Memoizes the top-N query for a time window.
///
/// Two states: `empty` until the first successful fetch, `populated`
/// afterwards. A populated cache never empties on its own; refreshes
/// replace the snapshot in place. A failed refresh surfaces the error
/// rather than silently serving the stale snapshot.
#[derive(Debug)]
pub struct LeaderboardCache {
    config: LeaderboardConfig,
    snapshot: Option<LeaderboardSnapshot>,
}

impl LeaderboardCache {
    pub fn new(config: LeaderboardConfig) -> Self {
        Self { config, snapshot: None }
    }

    /// Whether at least one fetch has succeeded.
    pub fn is_populated(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Return the cached snapshot, refreshing it from the store when it is
    /// older than the TTL or missing.
    pub async fn get<S>(&mut self, store: &S, now: Instant) -> VoteResult<LeaderboardSnapshot>
    where
        S: QuoteStore + ?Sized,
    {
        if let Some(snapshot) = &self.snapshot {
            if snapshot.age(now) < self.config.ttl() {
                tracing::debug!(
                    "[Leaderboard] Serving cached snapshot (age {:?})",
                    snapshot.age(now)
                );
                return Ok(snapshot.clone());
            }
        }

        tracing::info!("[Leaderboard] Fetching top {} from store", self.config.size);
        let entries = store
            .query_ordered(RATING_FIELD, SortDirection::Descending, self.config.size)
            .await?;

        let snapshot =
            LeaderboardSnapshot { entries, captured_at: Utc::now(), fetched_at: now };
        self.snapshot = Some(snapshot.clone());
        Ok(snapshot)
    }
}
