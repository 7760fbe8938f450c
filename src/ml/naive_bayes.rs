//! Gaussian naive Bayes.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use super::{Classifier, FittedModel, LabelEncoder, ModelError, argmax, validate_training};

#[derive(Debug, Clone)]
pub struct GaussianNb {
    /// Fraction of the largest feature variance added to every variance.
    pub var_smoothing: f64,
}

impl Default for GaussianNb {
    fn default() -> Self {
        Self {
            var_smoothing: 1e-9,
        }
    }
}

/// Per-class feature means and variances.
#[derive(Debug, Clone)]
pub struct GaussianNbModel {
    encoder: LabelEncoder,
    log_prior: Array1<f64>,
    /// Shape `[n_classes, n_features]`.
    means: Array2<f64>,
    variances: Array2<f64>,
}

impl Classifier for GaussianNb {
    fn name(&self) -> &str {
        "gaussian_nb"
    }

    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Box<dyn FittedModel>, ModelError> {
        let encoder = validate_training(x, y)?;
        let encoded = encoder.encode_all(y);
        let k = encoder.n_classes();
        let d = x.ncols();

        let max_var = x
            .var_axis(Axis(0), 0.0)
            .iter()
            .copied()
            .fold(0.0f64, f64::max);
        let epsilon = self.var_smoothing * max_var;

        let mut means = Array2::<f64>::zeros((k, d));
        let mut variances = Array2::<f64>::zeros((k, d));
        let mut log_prior = Array1::<f64>::zeros(k);
        for class_idx in 0..k {
            let rows: Vec<usize> = encoded
                .iter()
                .enumerate()
                .filter(|&(_, &c)| c == class_idx)
                .map(|(i, _)| i)
                .collect();
            let subset = x.select(Axis(0), &rows);
            if let Some(mean) = subset.mean_axis(Axis(0)) {
                means.row_mut(class_idx).assign(&mean);
            }
            let var = subset.var_axis(Axis(0), 0.0) + epsilon;
            variances.row_mut(class_idx).assign(&var);
            log_prior[class_idx] = (rows.len() as f64 / x.nrows() as f64).ln();
        }

        Ok(Box::new(GaussianNbModel {
            encoder,
            log_prior,
            means,
            variances,
        }))
    }
}

impl GaussianNbModel {
    /// Joint log-likelihood per class, shape `[n_rows, n_classes]`.
    pub fn joint_log_likelihood(&self, x: ArrayView2<'_, f64>) -> Array2<f64> {
        let k = self.encoder.n_classes();
        let mut out = Array2::<f64>::zeros((x.nrows(), k));
        for class_idx in 0..k {
            let mean = self.means.row(class_idx);
            let var = self.variances.row(class_idx);
            let norm: f64 = var
                .iter()
                .map(|&v| (2.0 * std::f64::consts::PI * v.max(f64::MIN_POSITIVE)).ln())
                .sum::<f64>()
                * -0.5;
            for (row_idx, row) in x.axis_iter(Axis(0)).enumerate() {
                let mut sq = 0.0;
                for ((&xi, &mu), &v) in row.iter().zip(mean.iter()).zip(var.iter()) {
                    let diff = xi - mu;
                    sq += diff * diff / v.max(f64::MIN_POSITIVE);
                }
                out[[row_idx, class_idx]] = self.log_prior[class_idx] + norm - 0.5 * sq;
            }
        }
        out
    }
}

impl FittedModel for GaussianNbModel {
    fn name(&self) -> &str {
        "gaussian_nb"
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        self.joint_log_likelihood(x)
            .axis_iter(Axis(0))
            .map(|row| self.encoder.decode(argmax(row.iter())))
            .collect()
    }
}
