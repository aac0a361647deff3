//! Seeded k-fold partitioning.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use tg_types::{TuneError, TuneResult};

/// A fixed assignment of row indices to K disjoint folds.
///
/// Built once per search from an explicit seed, then shared read-only by
/// every scoring unit, so all candidates are judged on identical splits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldPlan {
    folds: Vec<Vec<usize>>,
    n_rows: usize,
}

impl FoldPlan {
    /// Shuffle `0..n_rows` with a ChaCha generator seeded from `seed`
    /// and deal the indices into `k` folds. The first `n_rows % k`
    /// folds receive one extra row.
    pub fn new(n_rows: usize, k: usize, seed: u64) -> TuneResult<Self> {
        if k < 2 {
            return Err(TuneError::Config(format!(
                "k_folds must be at least 2, got {k}"
            )));
        }
        if n_rows < k {
            return Err(TuneError::Config(format!(
                "cannot split {n_rows} rows into {k} folds"
            )));
        }

        let mut indices: Vec<usize> = (0..n_rows).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let base = n_rows / k;
        let extra = n_rows % k;
        let mut folds = Vec::with_capacity(k);
        let mut cursor = 0;
        for fold in 0..k {
            let len = base + usize::from(fold < extra);
            folds.push(indices[cursor..cursor + len].to_vec());
            cursor += len;
        }

        Ok(Self { folds, n_rows })
    }

    pub fn k(&self) -> usize {
        self.folds.len()
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Held-out rows for the given fold.
    pub fn test_indices(&self, fold: usize) -> &[usize] {
        &self.folds[fold]
    }

    /// Training rows for the given fold: every row not held out.
    pub fn train_indices(&self, fold: usize) -> Vec<usize> {
        let mut indices = Vec::with_capacity(self.n_rows - self.folds[fold].len());
        for (i, f) in self.folds.iter().enumerate() {
            if i != fold {
                indices.extend_from_slice(f);
            }
        }
        indices
    }
}
