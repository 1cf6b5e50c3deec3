//! Ranking quality diagnostics (NDCG@K).
//!
//! Reported next to a ranked list, never used to change it.

use crate::scoring::ScoredCandidate;
use data_loader::InvestorPool;

/// Cutoff used for the NDCG reported with each request
pub const NDCG_K: usize = 10;

/// NDCG@k of `predicted_scores` against `true_relevance`.
///
/// - Gains are the relevance values themselves (negative ones count as 0)
/// - Position `i` (0-based) is discounted by `1 / log2(i + 2)`
/// - Rows with tied predicted scores share the average gain of their group,
///   so the result doesn't depend on how ties happen to be ordered
/// - The ideal DCG ranks by true relevance
///
/// Only the aligned prefix of the two slices is used. Returns 0.0 when it
/// is empty, when `k` is 0, or when no row has positive relevance.
pub fn ndcg_at_k(true_relevance: &[f64], predicted_scores: &[f64], k: usize) -> f64 {
    let n = true_relevance.len().min(predicted_scores.len());
    if n == 0 || k == 0 {
        return 0.0;
    }

    let gains: Vec<f64> = true_relevance[..n].iter().map(|&r| r.max(0.0)).collect();
    let scores = &predicted_scores[..n];

    let idcg = ideal_dcg(&gains, k);
    if idcg <= 0.0 {
        return 0.0;
    }

    (tie_averaged_dcg(&gains, scores, k) / idcg).clamp(0.0, 1.0)
}

fn discount(position: usize) -> f64 {
    1.0 / ((position + 2) as f64).log2()
}

fn ideal_dcg(gains: &[f64], k: usize) -> f64 {
    let mut sorted = gains.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    sorted
        .iter()
        .take(k)
        .enumerate()
        .map(|(i, &gain)| gain * discount(i))
        .sum()
}

fn tie_averaged_dcg(gains: &[f64], scores: &[f64], k: usize) -> f64 {
    let mut order: Vec<usize> = (0..gains.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut dcg = 0.0;
    let mut start = 0;
    while start < order.len() && start < k {
        let score = scores[order[start]];
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == score {
            end += 1;
        }

        let group = &order[start..end];
        let mean_gain = group.iter().map(|&i| gains[i]).sum::<f64>() / group.len() as f64;
        let discounts: f64 = (start..end.min(k)).map(discount).sum();
        dcg += mean_gain * discounts;

        start = end;
    }
    dcg
}

/// NDCG@k of a scored candidate set against the pool's Relevance labels.
///
/// Each candidate is paired with its own row's label; unlabelled rows are
/// left out of the evaluation.
pub fn evaluate_ndcg(scored: &[ScoredCandidate], pool: &InvestorPool, k: usize) -> f64 {
    let (truth, predicted): (Vec<f64>, Vec<f64>) = scored
        .iter()
        .filter_map(|candidate| {
            let label = pool.get(candidate.row_id)?.relevance?;
            Some((label, candidate.final_score))
        })
        .unzip();

    ndcg_at_k(&truth, &predicted, k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_perfect_ranking_is_one() {
        let ndcg = ndcg_at_k(&[3.0, 2.0, 1.0, 0.0], &[0.9, 0.8, 0.7, 0.1], 10);
        assert!(approx(ndcg, 1.0));
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(ndcg_at_k(&[], &[], 10), 0.0);
        assert_eq!(ndcg_at_k(&[1.0], &[], 10), 0.0);
        assert_eq!(ndcg_at_k(&[1.0, 2.0], &[0.5, 0.1], 0), 0.0);
    }

    #[test]
    fn test_all_irrelevant_is_zero() {
        assert_eq!(ndcg_at_k(&[0.0, 0.0], &[0.3, 0.2], 10), 0.0);
    }

    #[test]
    fn test_reversed_ranking() {
        // truth [1, 0]; predicted puts the relevant row second
        let ndcg = ndcg_at_k(&[1.0, 0.0], &[0.1, 0.9], 10);
        assert!(approx(ndcg, 1.0 / 3f64.log2()));
    }

    #[test]
    fn test_ties_share_gain() {
        // both tied at the top: DCG = 0.5 * (1 + 1/log2 3)
        let ndcg = ndcg_at_k(&[1.0, 0.0], &[0.5, 0.5], 10);
        let expected = 0.5 * (1.0 + 1.0 / 3f64.log2());
        assert!(approx(ndcg, expected));
    }

    #[test]
    fn test_cutoff_limits_contribution() {
        // relevant item ranked third, outside k=2
        let ndcg = ndcg_at_k(&[0.0, 0.0, 1.0], &[0.9, 0.8, 0.1], 2);
        assert_eq!(ndcg, 0.0);
    }

    #[test]
    fn test_matches_known_value() {
        // scikit-learn: ndcg_score([[10, 0, 0, 1, 5]], [[.1, .2, .3, 4, 70]]) == 0.6956940443813076
        let ndcg = ndcg_at_k(&[10.0, 0.0, 0.0, 1.0, 5.0], &[0.1, 0.2, 0.3, 4.0, 70.0], 5);
        assert!((ndcg - 0.695_694_044_381_307_6).abs() < 1e-9);
    }

    #[test]
    fn test_always_in_unit_interval() {
        let truth = [3.0, -1.0, 2.0, 0.0, 1.0, 4.0];
        let preds = [0.2, 0.9, 0.9, 0.1, 0.5, 0.3];
        for k in 1..8 {
            let v = ndcg_at_k(&truth, &preds, k);
            assert!((0.0..=1.0).contains(&v));
        }
    }
}
