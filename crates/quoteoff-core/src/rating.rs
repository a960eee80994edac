//! Elo rating updates.

/// New ratings produced by one comparison.
///
/// A stored rating is only ever replaced wholesale with one of these
/// values, never incrementally merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingUpdate {
    pub winner: i64,
    pub loser: i64,
}

/// Probability of `rating` beating `opponent` under the Elo model.
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / 400.0))
}

/// Compute post-comparison ratings for a winner/loser pair.
///
/// Output is rounded to integers. Ratings are not clamped; a long losing
/// streak can push a rating negative. Inputs are assumed finite.
pub fn compute_update(winner_rating: i64, loser_rating: i64, k: f64) -> RatingUpdate {
    let expected_winner = expected_score(winner_rating as f64, loser_rating as f64);
    let expected_loser = expected_score(loser_rating as f64, winner_rating as f64);

    RatingUpdate {
        winner: (winner_rating as f64 + k * (1.0 - expected_winner)).round() as i64,
        loser: (loser_rating as f64 + k * (0.0 - expected_loser)).round() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_ratings_split_k() {
        let update = compute_update(1000, 1000, 32.0);
        assert_eq!(update.winner, 1016);
        assert_eq!(update.loser, 984);
    }

    #[test]
    fn test_underdog_win_moves_far() {
        let update = compute_update(800, 1200, 32.0);
        assert_eq!(update.winner, 829);
        assert_eq!(update.loser, 1171);
    }

    #[test]
    fn test_favorite_win_moves_little() {
        let update = compute_update(1200, 800, 32.0);
        assert_eq!(update.winner, 1203);
        assert_eq!(update.loser, 797);
    }

    #[test]
    fn test_winner_never_drops() {
        for (winner, loser) in [(100, 2000), (1000, 1000), (2000, 100), (-50, 300)] {
            let update = compute_update(winner, loser, 32.0);
            assert!(update.winner >= winner, "winner {} dropped to {}", winner, update.winner);
            assert!(update.loser <= loser, "loser {} rose to {}", loser, update.loser);
        }
    }

    #[test]
    fn test_zero_k_is_noop() {
        let update = compute_update(1437, 912, 0.0);
        assert_eq!(update.winner, 1437);
        assert_eq!(update.loser, 912);
    }

    #[test]
    fn test_expected_scores_sum_to_one() {
        for (a, b) in [(1000.0, 1000.0), (1200.0, 800.0), (650.0, 1900.0)] {
            let sum = expected_score(a, b) + expected_score(b, a);
            assert!((sum - 1.0).abs() < 1e-12, "sum {} for ({}, {})", sum, a, b);
        }
    }

    #[test]
    fn test_rating_can_go_negative() {
        let update = compute_update(5, 5, 32.0);
        assert_eq!(update.loser, -11);
    }
}
