use log::debug;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::data::model::Dataset;
use crate::error::{AnalysisError, AnalysisResult};

/// Guards `fraction * n` against landing a hair below an integer.
const ROUNDING_SLACK: f64 = 1e-9;

/// Number of test rows for a dataset of `n` rows: `floor(fraction * n)`,
/// remainder to train.
pub fn test_size(n: usize, fraction: f64) -> usize {
    ((fraction * n as f64 + ROUNDING_SLACK).floor() as usize).min(n)
}

/// Shuffle row indices with a seeded ChaCha8 stream and cut off the test
/// share. Both index lists come back sorted so partitions keep source order.
pub fn split_indices(n: usize, fraction: f64, seed: u64) -> AnalysisResult<(Vec<usize>, Vec<usize>)> {
    if !(0.0..=1.0).contains(&fraction) {
        return Err(AnalysisError::InvalidParameter(format!(
            "test fraction {fraction} (must be in [0, 1])"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = test_size(n, fraction);
    let mut test = indices[..n_test].to_vec();
    let mut train = indices[n_test..].to_vec();
    test.sort_unstable();
    train.sort_unstable();
    Ok((train, test))
}

/// Partition `dataset` into `(train, test)`. Deterministic for a given seed.
pub fn train_test_split(
    dataset: &Dataset,
    fraction: f64,
    seed: u64,
) -> AnalysisResult<(Dataset, Dataset)> {
    let (train, test) = split_indices(dataset.len(), fraction, seed)?;
    debug!("Split {} rows into {} train / {} test (seed {seed})", dataset.len(), train.len(), test.len());
    Ok((dataset.take_rows(&train), dataset.take_rows(&test)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn numbered(n: usize) -> Dataset {
        Dataset::from_columns(vec![(
            "Id".into(),
            Column::Scalar((0..n).map(|i| i as f64).collect()),
        )])
        .unwrap()
    }

    #[test]
    fn test_split_sizes() {
        let (train, test) = train_test_split(&numbered(100), 0.2, 7).unwrap();
        assert_eq!(test.len(), 20);
        assert_eq!(train.len(), 80);
    }

    #[test]
    fn test_split_is_deterministic() {
        let ds = numbered(100);
        let a = train_test_split(&ds, 0.2, 42).unwrap();
        let b = train_test_split(&ds, 0.2, 42).unwrap();
        assert_eq!(a, b);

        let c = train_test_split(&ds, 0.2, 43).unwrap();
        assert_ne!(a.1, c.1);
    }

    #[test]
    fn test_partitions_are_disjoint_and_complete() {
        let (train, test) = split_indices(57, 0.3, 1).unwrap();
        assert_eq!(test.len(), 17);
        let mut all: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..57).collect::<Vec<_>>());
    }

    #[test]
    fn test_rounding_floors() {
        assert_eq!(test_size(10, 0.25), 2);
        assert_eq!(test_size(100, 0.7), 70);
        assert_eq!(test_size(3, 1.0), 3);
        assert_eq!(test_size(0, 0.5), 0);
    }

    #[test]
    fn test_invalid_fraction() {
        assert!(split_indices(10, 1.5, 0).is_err());
        assert!(split_indices(10, -0.1, 0).is_err());
        assert!(split_indices(10, f64::NAN, 0).is_err());
    }
}
