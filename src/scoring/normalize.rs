//! Rank-based normalization.
//!
//! Scores are replaced by values evenly spaced over `[0, N]` that depend only
//! on each score's position in the descending order, so repeated periods
//! cannot drift the scale up or down.

use super::engine::round_to;

/// 1-based descending ranks, positionally aligned with `scores`.
///
/// The highest score gets rank 1. Equal scores keep their input order: the
/// first occurrence gets the smaller rank.
pub fn descending_ranks(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    // sort_by is stable, so ties stay in index order. total_cmp keeps the
    // order total when an overflowing score turns into NaN.
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut ranks = vec![0usize; scores.len()];
    for (position, &index) in order.iter().enumerate() {
        ranks[index] = position + 1;
    }
    ranks
}

/// Map rank `r` of `total` drivers to `(r - 1) * total / (total - 1)`.
///
/// Callers guarantee `total > 1`.
pub fn rank_to_score(rank: usize, total: usize) -> f64 {
    debug_assert!(total > 1, "rank spread needs at least two drivers");
    (rank - 1) as f64 * total as f64 / (total - 1) as f64
}

/// Replace each score by the rounded spread value of its descending rank.
///
/// Fewer than two scores cannot be spread and are returned unchanged.
pub fn normalize_rankings(scores: &[f64], precision: u32) -> Vec<f64> {
    let total = scores.len();
    if total <= 1 {
        return scores.to_vec();
    }

    descending_ranks(scores)
        .into_iter()
        .map(|rank| round_to(rank_to_score(rank, total), precision))
        .collect()
}
