//! Configuration types for the voting core.
//!
//! Every tunable is a plain field with a serde default, so embedders can
//! load partial configuration files and still get working values.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Elo rating parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EloConfig {
    /// Maximum possible rating adjustment per comparison.
    #[serde(default = "default_k_factor")]
    pub k_factor: f64,
}

fn default_k_factor() -> f64 {
    32.0
}

impl Default for EloConfig {
    fn default() -> Self {
        Self { k_factor: 32.0 }
    }
}

/// Random pair selection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Upper bound of the sampling id range `[1, id_range_max]`.
    ///
    /// A conservative estimate of the live record count, not derived from
    /// the store. Identifiers above the live count are gaps and consume
    /// retry attempts.
    #[serde(default = "default_id_range_max")]
    pub id_range_max: u32,

    /// Lookup attempts per single draw before giving up.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Pairing rounds before the whole selection fails.
    #[serde(default = "default_max_pair_attempts")]
    pub max_pair_attempts: u32,

    /// When true, the second draw of a pair excludes the first draw's id
    /// instead of relying on post-hoc collision detection. The two draws
    /// then run sequentially rather than concurrently.
    #[serde(default)]
    pub exclude_first_draw: bool,
}

fn default_id_range_max() -> u32 {
    300
}

fn default_max_retries() -> u32 {
    3
}

fn default_max_pair_attempts() -> u32 {
    5
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            id_range_max: 300,
            max_retries: 3,
            max_pair_attempts: 5,
            exclude_first_draw: false,
        }
    }
}

/// Leaderboard query and cache parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// Number of top-rated records to fetch.
    #[serde(default = "default_leaderboard_size")]
    pub size: usize,

    /// Maximum age of a cached snapshot in milliseconds.
    #[serde(default = "default_leaderboard_ttl_ms")]
    pub ttl_ms: u64,
}

fn default_leaderboard_size() -> usize {
    10
}

fn default_leaderboard_ttl_ms() -> u64 {
    60_000
}

impl LeaderboardConfig {
    /// Snapshot TTL as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self { size: 10, ttl_ms: 60_000 }
    }
}

/// Aggregate configuration handed to a voting session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoteConfig {
    #[serde(default)]
    pub elo: EloConfig,

    #[serde(default)]
    pub sampler: SamplerConfig,

    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VoteConfig::default();
        assert_eq!(config.elo.k_factor, 32.0);
        assert_eq!(config.sampler.id_range_max, 300);
        assert_eq!(config.sampler.max_retries, 3);
        assert!(!config.sampler.exclude_first_draw);
        assert_eq!(config.leaderboard.size, 10);
        assert_eq!(config.leaderboard.ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_partial_deserialization() {
        let config: VoteConfig =
            serde_json::from_str(r#"{"sampler": {"id_range_max": 50}}"#).unwrap();
        assert_eq!(config.sampler.id_range_max, 50);
        assert_eq!(config.sampler.max_retries, 3);
        assert_eq!(config.elo.k_factor, 32.0);
    }
}
