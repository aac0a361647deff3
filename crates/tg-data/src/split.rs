//! Seeded holdout splitting.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tg_types::{DataError, Dataset, TuneError, TuneResult};

/// Split a dataset into a training and a held-out test partition.
///
/// Rows are shuffled with a ChaCha generator seeded from `seed`, so the
/// same call yields the same partition. At least one row lands on each
/// side.
pub fn train_test_split(
    data: &Dataset,
    test_fraction: f64,
    seed: u64,
) -> TuneResult<(Dataset, Dataset)> {
    if !(0.0..1.0).contains(&test_fraction) || test_fraction == 0.0 {
        return Err(TuneError::Config(format!(
            "test_fraction must be in (0, 1), got {test_fraction}"
        )));
    }
    let n = data.n_rows();
    if n < 2 {
        return Err(DataError::EmptyDataset.into());
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64 * test_fraction).round() as usize).clamp(1, n - 1);
    let test = data.take(&indices[..n_test])?;
    let train = data.take(&indices[n_test..])?;

    tracing::debug!(
        train_rows = train.n_rows(),
        test_rows = test.n_rows(),
        seed,
        "Holdout split"
    );

    Ok((train, test))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy(n: usize) -> Dataset {
        Dataset::new(
            vec!["x".to_string()],
            (0..n).map(|i| vec![i as f64]).collect(),
            vec![0; n],
            vec!["only".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn split_sizes_follow_fraction() {
        let data = toy(10);
        let (train, test) = train_test_split(&data, 0.3, 42).unwrap();
        assert_eq!(test.n_rows(), 3);
        assert_eq!(train.n_rows(), 7);
    }

    #[test]
    fn partitions_are_disjoint_and_cover_everything() {
        let data = toy(20);
        let (train, test) = train_test_split(&data, 0.25, 7).unwrap();

        let mut seen: Vec<f64> = train
            .rows()
            .chain(test.rows())
            .map(|r| r[0])
            .collect();
        seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let expected: Vec<f64> = (0..20).map(|i| i as f64).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn same_seed_reproduces_the_split() {
        let data = toy(50);
        let (train_a, test_a) = train_test_split(&data, 0.2, 99).unwrap();
        let (train_b, test_b) = train_test_split(&data, 0.2, 99).unwrap();
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
    }

    #[test]
    fn different_seeds_differ() {
        let data = toy(50);
        let (_, test_a) = train_test_split(&data, 0.2, 1).unwrap();
        let (_, test_b) = train_test_split(&data, 0.2, 2).unwrap();
        assert_ne!(test_a, test_b);
    }

    #[test]
    fn fraction_bounds_are_enforced() {
        let data = toy(10);
        assert!(train_test_split(&data, 0.0, 0).is_err());
        assert!(train_test_split(&data, 1.0, 0).is_err());
    }
}
