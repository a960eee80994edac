//! Random selection of two distinct, existing records.
//!
//! The sampler does not know the live record count. It draws candidate
//! identifiers uniformly from a configured range and probes the store for
//! each one; gaps in the id space and transient store failures consume
//! retry attempts, a drawn-but-excluded id does not.

use quoteoff_types::{Pair, Quote, SamplerConfig, VoteError, VoteResult};
use rand::Rng;

use crate::store::{QuoteStore, QUOTE_ID_FIELD};

/// Selects random pairs from a [`QuoteStore`].
#[derive(Debug, Clone)]
pub struct PairSampler {
    config: SamplerConfig,
}

impl PairSampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Draw one existing record, never one whose id equals `exclude`.
    ///
    /// Returns `None` once the attempt budget is spent. Store errors are
    /// logged and treated like gaps in the id space; the caller only sees
    /// the exhausted draw.
    pub async fn sample_one<S>(&self, store: &S, exclude: Option<u32>) -> Option<Quote>
    where
        S: QuoteStore + ?Sized,
    {
        let mut attempts = 0;

        while attempts < self.config.max_retries {
            let candidate =
                match draw_candidate(&mut rand::thread_rng(), self.config.id_range_max, exclude) {
                    Some(id) => id,
                    None => {
                        tracing::warn!(
                            "[Sampler] No candidate id possible in range [1, {}] excluding {:?}",
                            self.config.id_range_max,
                            exclude
                        );
                        return None;
                    }
                };

            match store.query_by_field(QUOTE_ID_FIELD, i64::from(candidate), 1).await {
                Ok(records) => {
                    if let Some(quote) = records.into_iter().next() {
                        return Some(quote);
                    }
                    tracing::debug!("[Sampler] No record with id {}, retrying", candidate);
                }
                Err(e) => {
                    tracing::warn!("[Sampler] Lookup failed for id {}: {}", candidate, e);
                }
            }
            attempts += 1;
        }

        tracing::debug!("[Sampler] Draw exhausted after {} attempts", attempts);
        None
    }

    /// Select two distinct existing records.
    ///
    /// Each round draws twice, concurrently and without mutual exclusion
    /// by default; a collision or failed draw discards the round. With
    /// `exclude_first_draw` set the draws run sequentially and the second
    /// excludes the first's id up front.
    pub async fn sample_pair<S>(&self, store: &S) -> VoteResult<Pair>
    where
        S: QuoteStore + ?Sized,
    {
        for attempt in 1..=self.config.max_pair_attempts {
            let (left, right) = if self.config.exclude_first_draw {
                let left = self.sample_one(store, None).await;
                let exclude = left.as_ref().map(|q| q.quote_id);
                let right = self.sample_one(store, exclude).await;
                (left, right)
            } else {
                tokio::join!(self.sample_one(store, None), self.sample_one(store, None))
            };

            match (left, right) {
                (Some(left), Some(right)) if left.quote_id != right.quote_id => {
                    return Ok(Pair { left, right });
                }
                (Some(left), Some(_)) => {
                    tracing::debug!(
                        "[Sampler] Collision on id {} (round {}), retrying pair",
                        left.quote_id,
                        attempt
                    );
                }
                _ => {
                    tracing::debug!("[Sampler] Incomplete draw (round {}), retrying pair", attempt);
                }
            }
        }

        tracing::warn!(
            "[Sampler] No distinct pair after {} rounds",
            self.config.max_pair_attempts
        );
        Err(VoteError::SamplerExhausted { attempts: self.config.max_pair_attempts })
    }
}

/// Draw a candidate id from `[1, range_max]`, redrawing while it hits
/// `exclude`. The redraw is immediate and unmetered; only store lookups
/// consume retry attempts. Returns `None` when the exclusion covers the
/// entire range.
pub(crate) fn draw_candidate<R: Rng>(
    rng: &mut R,
    range_max: u32,
    exclude: Option<u32>,
) -> Option<u32> {
    if range_max == 0 || (range_max == 1 && exclude == Some(1)) {
        return None;
    }
    loop {
        let candidate = rng.gen_range(1..=range_max);
        if exclude == Some(candidate) {
            continue;
        }
        return Some(candidate);
    }
}
