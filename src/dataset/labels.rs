//! Rating targets and label binarization.

use std::fmt;

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// `1.0` where `value > threshold`, else `0.0`.
pub fn binarize_above(values: ArrayView1<'_, f64>, threshold: f64) -> Array1<f64> {
    values.mapv(|v| if v > threshold { 1.0 } else { 0.0 })
}

/// `1.0` where `value == target`, else `0.0`.
pub fn binarize_equal(values: ArrayView1<'_, f64>, target: f64) -> Array1<f64> {
    values.mapv(|v| if v == target { 1.0 } else { 0.0 })
}

/// What the selector is asked to predict from a star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// The rating itself, 1 to 5.
    Exact,
    /// Rating above 2.
    Positive,
    /// Rating of exactly 1.
    Negative,
}

impl Target {
    pub const ALL: [Target; 3] = [Target::Exact, Target::Positive, Target::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Exact => "exact",
            Target::Positive => "positive",
            Target::Negative => "negative",
        }
    }

    /// Turn raw ratings into this target's labels.
    pub fn labels(&self, ratings: ArrayView1<'_, f64>) -> Array1<f64> {
        match self {
            Target::Exact => ratings.to_owned(),
            Target::Positive => binarize_above(ratings, 2.0),
            Target::Negative => binarize_equal(ratings, 1.0),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn binarization_examples() {
        let ratings = array![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(binarize_above(ratings.view(), 2.0), array![0.0, 0.0, 1.0, 1.0, 1.0]);
        assert_eq!(binarize_equal(ratings.view(), 1.0), array![1.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn targets_map_ratings() {
        let ratings = array![1.0, 3.0, 5.0];
        assert_eq!(Target::Exact.labels(ratings.view()), ratings);
        assert_eq!(Target::Positive.labels(ratings.view()), array![0.0, 1.0, 1.0]);
        assert_eq!(Target::Negative.labels(ratings.view()), array![1.0, 0.0, 0.0]);
    }
}
