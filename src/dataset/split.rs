//! Seeded train/test partition.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplitError {
    #[error("Test fraction must be in (0, 1), got {0}")]
    InvalidFraction(f64),
    #[error("Features ({features}) and labels ({labels}) differ in length")]
    LengthMismatch { features: usize, labels: usize },
    #[error("Split of {rows} rows at fraction {fraction} leaves an empty partition")]
    EmptyPartition { rows: usize, fraction: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
    /// Source row indices of the training partition, in draw order.
    pub train_rows: Vec<usize>,
    pub test_rows: Vec<usize>,
}

/// Row counts `(n_train, n_test)` for `n_rows` at `test_fraction`.
pub fn split_sizes(n_rows: usize, test_fraction: f64) -> Result<(usize, usize), SplitError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(SplitError::InvalidFraction(test_fraction));
    }
    let n_test = (test_fraction * n_rows as f64).ceil() as usize;
    if n_test == 0 || n_test >= n_rows {
        return Err(SplitError::EmptyPartition {
            rows: n_rows,
            fraction: test_fraction,
        });
    }
    Ok((n_rows - n_test, n_test))
}

/// Shuffle row indices with `seed`; the first `ceil(fraction · n)` become the
/// test partition.
pub fn train_test_split(
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
    test_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit, SplitError> {
    if x.nrows() != y.len() {
        return Err(SplitError::LengthMismatch {
            features: x.nrows(),
            labels: y.len(),
        });
    }
    let (_, n_test) = split_sizes(x.nrows(), test_fraction)?;
    let mut order: Vec<usize> = (0..x.nrows()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    let train_rows = order.split_off(n_test);
    let test_rows = order;
    Ok(TrainTestSplit {
        x_train: x.select(Axis(0), &train_rows),
        x_test: x.select(Axis(0), &test_rows),
        y_train: y.select(Axis(0), &train_rows),
        y_test: y.select(Axis(0), &test_rows),
        train_rows,
        test_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    #[test]
    fn quarter_split_of_hundred_rows() {
        let x = Array::from_shape_fn((100, 5), |(r, c)| (r * 5 + c) as f64);
        let y = Array::from_shape_fn(100, |r| (r % 5 + 1) as f64);
        let split = train_test_split(x.view(), y.view(), 0.25, 0).unwrap();
        assert_eq!(split.x_train.nrows(), 75);
        assert_eq!(split.x_test.nrows(), 25);
        assert_eq!(split.y_train.len(), 75);
        assert_eq!(split.y_test.len(), 25);

        let mut all: Vec<usize> = split.train_rows.iter().chain(&split.test_rows).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn rows_stay_aligned_with_labels() {
        let x = Array::from_shape_fn((10, 1), |(r, _)| r as f64);
        let y = Array::from_shape_fn(10, |r| r as f64 * 10.0);
        let split = train_test_split(x.view(), y.view(), 0.3, 7).unwrap();
        for (row, label) in split.x_test.column(0).iter().zip(split.y_test.iter()) {
            assert_eq!(row * 10.0, *label);
        }
    }

    #[test]
    fn same_seed_same_partition() {
        let x = Array::from_shape_fn((20, 2), |(r, c)| (r + c) as f64);
        let y = Array::from_shape_fn(20, |r| (r % 2) as f64);
        let a = train_test_split(x.view(), y.view(), 0.25, 3).unwrap();
        let b = train_test_split(x.view(), y.view(), 0.25, 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_degenerate_splits() {
        assert_eq!(split_sizes(10, 0.0), Err(SplitError::InvalidFraction(0.0)));
        assert_eq!(split_sizes(10, 1.0), Err(SplitError::InvalidFraction(1.0)));
        assert!(matches!(
            split_sizes(1, 0.25),
            Err(SplitError::EmptyPartition { rows: 1, .. })
        ));
        assert_eq!(split_sizes(4, 0.25), Ok((3, 1)));
    }
}
