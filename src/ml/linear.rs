//! Linear decision functions shared by the logistic, SVC, perceptron and SGD
//! classifiers.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use super::{FittedModel, LabelEncoder, argmax};

/// A fitted linear model with one weight row per class.
#[derive(Debug, Clone)]
pub struct LinearModel {
    pub(crate) name: String,
    pub(crate) encoder: LabelEncoder,
    /// Shape `[n_classes, n_features]`.
    pub(crate) weights: Array2<f64>,
    pub(crate) bias: Array1<f64>,
}

impl LinearModel {
    /// Raw per-class scores, shape `[n_rows, n_classes]`.
    pub fn decision_function(&self, x: ArrayView2<'_, f64>) -> Array2<f64> {
        x.dot(&self.weights.t()) + &self.bias
    }

    pub fn classes(&self) -> &[f64] {
        self.encoder.classes()
    }
}

impl FittedModel for LinearModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        self.decision_function(x)
            .axis_iter(Axis(0))
            .map(|scores| self.encoder.decode(argmax(scores.iter())))
            .collect()
    }
}

/// Fit an independent binary problem per class.
///
/// `fit_binary` receives the feature matrix and `+1 / -1` targets for one
/// class and returns that class's `(weights, bias)`.
pub(crate) fn fit_one_vs_rest<F>(
    x: ArrayView2<'_, f64>,
    encoded: &[usize],
    n_classes: usize,
    mut fit_binary: F,
) -> (Array2<f64>, Array1<f64>)
where
    F: FnMut(ArrayView2<'_, f64>, ArrayView1<'_, f64>, usize) -> (Array1<f64>, f64),
{
    let mut weights = Array2::zeros((n_classes, x.ncols()));
    let mut bias = Array1::zeros(n_classes);
    for class_idx in 0..n_classes {
        let targets: Array1<f64> = encoded
            .iter()
            .map(|&y| if y == class_idx { 1.0 } else { -1.0 })
            .collect();
        let (w, b) = fit_binary(x, targets.view(), class_idx);
        weights.row_mut(class_idx).assign(&w);
        bias[class_idx] = b;
    }
    (weights, bias)
}
