//! Per-session voting context.
//!
//! Owns the state the browser original kept in globals (`currentPair`, the
//! leaderboard cache) and drives one user's voting flow: load a pair, take
//! a vote, write ratings back, load the next pair.

use std::time::Instant;

use quoteoff_types::{Pair, VoteConfig, VoteError, VoteResult};

use crate::leaderboard::{LeaderboardCache, LeaderboardSnapshot};
use crate::presenter::Presenter;
use crate::rating::{compute_update, RatingUpdate};
use crate::sampler::PairSampler;
use crate::store::{FieldUpdate, QuoteStore, RATING_FIELD, VOTE_COUNT_FIELD};

/// Which displayed quote won the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// One user's voting session against a store and a display surface.
pub struct VoteSession<S, P> {
    store: S,
    presenter: P,
    sampler: PairSampler,
    cache: LeaderboardCache,
    k_factor: f64,
    current_pair: Option<Pair>,
}

impl<S, P> VoteSession<S, P>
where
    S: QuoteStore,
    P: Presenter,
{
    pub fn new(store: S, presenter: P, config: VoteConfig) -> Self {
        Self {
            store,
            presenter,
            sampler: PairSampler::new(config.sampler),
            cache: LeaderboardCache::new(config.leaderboard),
            k_factor: config.elo.k_factor,
            current_pair: None,
        }
    }

    /// The pair currently offered for comparison, if any.
    pub fn current_pair(&self) -> Option<&Pair> {
        self.current_pair.as_ref()
    }

    /// Sample a fresh pair, replacing the current one on success.
    ///
    /// On sampler exhaustion the user sees an error and the previous pair
    /// (if any) stays in place; the session does not retry on its own.
    pub async fn load_pair(&mut self) -> VoteResult<()> {
        if self.current_pair.is_none() {
            self.presenter.show_loading();
        }

        match self.sampler.sample_pair(&self.store).await {
            Ok(pair) => {
                self.presenter.render_pair(&pair.left, &pair.right);
                self.current_pair = Some(pair);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("[Session] Failed to load pair: {}", e);
                self.presenter.show_error("Error loading quotes. Please refresh.");
                Err(e)
            }
        }
    }

    /// Record a win for one side of the current pair.
    ///
    /// Computes the Elo update, writes both records back concurrently
    /// (winner: new rating plus vote-count increment; loser: new rating),
    /// then loads the next pair. A failed write surfaces as
    /// [`VoteError::UpdateFailed`] and the vote may be lost, but a fresh
    /// pair is still requested so the session can continue.
    pub async fn vote(&mut self, winner_side: Side) -> VoteResult<RatingUpdate> {
        let pair = self.current_pair.clone().ok_or(VoteError::NoActivePair)?;
        let (winner, loser) = match winner_side {
            Side::Left => (&pair.left, &pair.right),
            Side::Right => (&pair.right, &pair.left),
        };

        let update = compute_update(winner.rating, loser.rating, self.k_factor);

        let winner_updates = [
            FieldUpdate::set(RATING_FIELD, update.winner),
            FieldUpdate::increment(VOTE_COUNT_FIELD, 1),
        ];
        let loser_updates = [FieldUpdate::set(RATING_FIELD, update.loser)];

        let written = tokio::try_join!(
            self.store.update_fields(&winner.doc_key, &winner_updates),
            self.store.update_fields(&loser.doc_key, &loser_updates),
        );

        match written {
            Ok(_) => {
                tracing::info!(
                    "[Session] Vote recorded: {} {} -> {}, {} {} -> {}",
                    winner.quote_id,
                    winner.rating,
                    update.winner,
                    loser.quote_id,
                    loser.rating,
                    update.loser
                );
                self.load_pair().await?;
                Ok(update)
            }
            Err(e) => {
                tracing::warn!("[Session] Rating write failed: {}", e);
                self.presenter.show_error("Vote failed to record. Please try again.");
                // Best effort: move the session along even though the vote
                // may be lost.
                if let Err(reload) = self.load_pair().await {
                    tracing::warn!("[Session] Reload after failed vote also failed: {}", reload);
                }
                Err(VoteError::UpdateFailed { message: e.to_string() })
            }
        }
    }

    /// Fetch the leaderboard, served from cache inside the TTL window.
    pub async fn leaderboard(&mut self, now: Instant) -> VoteResult<LeaderboardSnapshot> {
        match self.cache.get(&self.store, now).await {
            Ok(snapshot) => {
                self.presenter.render_leaderboard(&snapshot.entries);
                Ok(snapshot)
            }
            Err(e) => {
                tracing::warn!("[Session] Leaderboard fetch failed: {}", e);
                self.presenter.show_error("Error loading leaderboard.");
                Err(e)
            }
        }
    }
}
