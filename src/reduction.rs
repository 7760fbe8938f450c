//! PCA sized by cumulative explained variance.

use linfa::DatasetBase;
use linfa::traits::{Fit, Predict};
use linfa_reduction::Pca;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::dataset::{Dataset, DatasetError};

#[derive(Debug, Error)]
pub enum ReductionError {
    #[error("Need at least 2 rows and 2 columns to reduce, got {rows}x{cols}")]
    TooSmall { rows: usize, cols: usize },
    #[error("PCA failed: {0}")]
    Pca(#[from] linfa_reduction::ReductionError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Summary of how many components were kept and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarianceProfile {
    /// Explained-variance ratio of each fitted component, largest first.
    pub ratios: Vec<f64>,
    pub kept: usize,
    /// Cumulative ratio of the kept components.
    pub explained: f64,
}

#[derive(Debug, Clone)]
pub struct Reduction {
    /// `Component_<i>` columns, one row per input row.
    pub components: Dataset,
    pub profile: VarianceProfile,
}

/// Smallest `k` whose cumulative ratio reaches `target`; all of them if the
/// target is never reached.
pub fn components_for_target(ratios: &[f64], target: f64) -> usize {
    let mut cumulative = 0.0;
    for (idx, ratio) in ratios.iter().enumerate() {
        cumulative += ratio;
        if cumulative >= target {
            return idx + 1;
        }
    }
    ratios.len()
}

/// Fit PCA with up to `max_components` and project onto the components that
/// reach `variance_target`.
///
/// Columns are mean-centered before decomposition, so the component count can
/// differ from a truncated SVD of the raw TF-IDF matrix.
pub fn reduce(
    x: ArrayView2<'_, f64>,
    variance_target: f64,
    max_components: usize,
) -> Result<Reduction, ReductionError> {
    let (rows, cols) = x.dim();
    if rows < 2 || cols < 2 {
        return Err(ReductionError::TooSmall { rows, cols });
    }
    let fit_components = max_components.clamp(1, rows.min(cols) - 1);
    let owned = x.to_owned();
    let dataset = DatasetBase::from(owned.clone());
    let pca = Pca::params(fit_components).fit(&dataset)?;

    let total_variance: f64 = x.var_axis(Axis(0), 1.0).sum();
    let singular = pca.singular_values();
    let mut order: Vec<usize> = (0..singular.len()).collect();
    order.sort_by(|&a, &b| singular[b].total_cmp(&singular[a]));
    let ratios: Vec<f64> = order
        .iter()
        .map(|&i| {
            let variance = singular[i] * singular[i] / (rows as f64 - 1.0);
            if total_variance > 0.0 {
                variance / total_variance
            } else {
                0.0
            }
        })
        .collect();
    let kept = components_for_target(&ratios, variance_target).max(1);
    let explained: f64 = ratios[..kept].iter().sum();
    info!(
        fitted = ratios.len(),
        kept,
        explained = format!("{explained:.4}"),
        "Reduced term matrix"
    );

    let projected: Array2<f64> = pca.predict(&owned);
    let values = projected.select(Axis(1), &order[..kept]);
    let columns = (0..kept).map(|i| format!("Component_{i}")).collect();
    Ok(Reduction {
        components: Dataset::new(columns, values)?,
        profile: VarianceProfile {
            ratios,
            kept,
            explained,
        },
    })
}

/// Cumulative sums of `ratios`.
pub fn cumulative(ratios: &[f64]) -> Array1<f64> {
    let mut total = 0.0;
    ratios
        .iter()
        .map(|r| {
            total += r;
            total
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn target_picks_smallest_prefix() {
        let ratios = [0.5, 0.3, 0.1, 0.05];
        assert_eq!(components_for_target(&ratios, 0.85), 3);
        assert_eq!(components_for_target(&ratios, 0.5), 1);
        assert_eq!(components_for_target(&ratios, 0.99), 4);
    }

    #[test]
    fn cumulative_sums_ratios() {
        assert_eq!(cumulative(&[0.5, 0.25]).to_vec(), vec![0.5, 0.75]);
    }

    #[test]
    fn dominant_direction_needs_one_component() {
        let x = Array2::from_shape_fn((12, 4), |(r, c)| {
            (r as f64 - 5.5) * (c as f64 + 1.0) + ((r * 7 + c * 3) % 5) as f64 * 0.01
        });
        let reduction = reduce(x.view(), 0.85, 3).unwrap();
        assert_eq!(reduction.profile.kept, 1);
        assert!(reduction.profile.explained > 0.99);
        assert_eq!(reduction.components.columns(), &["Component_0".to_string()]);
        assert_eq!(reduction.components.n_rows(), 12);
    }

    #[test]
    fn tiny_inputs_are_rejected() {
        let x = Array2::<f64>::zeros((1, 5));
        assert!(matches!(
            reduce(x.view(), 0.85, 10),
            Err(ReductionError::TooSmall { rows: 1, cols: 5 })
        ));
    }
}
