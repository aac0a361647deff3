//! Aggregated search results.

use serde::{Deserialize, Serialize};

use crate::params::ParamSet;

/// One row of the aggregated result table: a parameter combination with
/// its per-fold scores, summary statistics, and rank (1 = best mean).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSummary {
    /// Enumeration index of the combination within the expanded grid.
    pub candidate: usize,
    pub params: ParamSet,
    /// Scores in fold order; never mutated after the search.
    pub fold_scores: Vec<f64>,
    pub mean_score: f64,
    pub std_score: f64,
    /// Assigned by the driver once all candidates are scored.
    pub rank: usize,
}

impl CandidateSummary {
    /// Aggregate fold scores into mean and population standard
    /// deviation. The rank is left at 0 until every candidate is known.
    pub fn aggregate(candidate: usize, params: ParamSet, fold_scores: Vec<f64>) -> Self {
        let (mean_score, std_score) = mean_and_std(&fold_scores);
        Self {
            candidate,
            params,
            fold_scores,
            mean_score,
            std_score,
            rank: 0,
        }
    }
}

/// Mean and population standard deviation of a score sequence.
pub fn mean_and_std(scores: &[f64]) -> (f64, f64) {
    if scores.is_empty() {
        return (0.0, 0.0);
    }
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_two_fold_scores() {
        let (mean, std) = mean_and_std(&[0.80, 0.84]);
        assert!((mean - 0.82).abs() < 1e-12);
        assert!((std - 0.02).abs() < 1e-12);
    }

    #[test]
    fn zero_spread_has_zero_std() {
        let (mean, std) = mean_and_std(&[0.5, 0.5, 0.5]);
        assert_eq!(mean, 0.5);
        assert_eq!(std, 0.0);
    }

    #[test]
    fn aggregate_keeps_fold_order() {
        let mut params = ParamSet::new();
        params.insert("k", 3i64);
        let summary = CandidateSummary::aggregate(4, params, vec![0.9, 0.7]);
        assert_eq!(summary.candidate, 4);
        assert_eq!(summary.fold_scores, vec![0.9, 0.7]);
        assert!((summary.mean_score - 0.8).abs() < 1e-12);
        assert_eq!(summary.rank, 0);
    }
}
