use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::ml::{FittedModel, LabelEncoder, argmax, softmax_inplace};

#[derive(Debug, Clone)]
pub struct MlpModel {
    pub(crate) encoder: LabelEncoder,
    pub(crate) feature_mean: Array1<f64>,
    /// Per-feature scale; constant features carry 1.0.
    pub(crate) feature_std: Array1<f64>,
    /// `[hidden, n_features]`
    pub(crate) weights1: Array2<f64>,
    pub(crate) bias1: Array1<f64>,
    /// `[n_classes, hidden]`
    pub(crate) weights2: Array2<f64>,
    pub(crate) bias2: Array1<f64>,
}

impl MlpModel {
    pub fn hidden_size(&self) -> usize {
        self.bias1.len()
    }

    pub fn classes(&self) -> &[f64] {
        self.encoder.classes()
    }

    /// Class probabilities, shape `[n_rows, n_classes]`.
    pub fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Array2<f64> {
        let normalized = (&x - &self.feature_mean) / &self.feature_std;
        let hidden = (normalized.dot(&self.weights1.t()) + &self.bias1).mapv(|v| v.max(0.0));
        let mut probs = hidden.dot(&self.weights2.t()) + &self.bias2;
        for mut row in probs.axis_iter_mut(Axis(0)) {
            if let Some(values) = row.as_slice_mut() {
                softmax_inplace(values);
            }
        }
        probs
    }
}

impl FittedModel for MlpModel {
    fn name(&self) -> &str {
        "mlp"
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        self.predict_proba(x)
            .axis_iter(Axis(0))
            .map(|row| self.encoder.decode(argmax(row.iter())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn probabilities_sum_to_one() {
        let model = MlpModel {
            encoder: LabelEncoder::fit(array![1.0, 2.0, 3.0].view()),
            feature_mean: Array1::zeros(2),
            feature_std: Array1::ones(2),
            weights1: array![[0.5, -0.2], [0.1, 0.3]],
            bias1: Array1::zeros(2),
            weights2: array![[1.0, 0.0], [0.0, 1.0], [0.5, 0.5]],
            bias2: Array1::zeros(3),
        };
        let probs = model.predict_proba(array![[1.0, 2.0], [-1.0, 0.5]].view());
        for row in probs.axis_iter(Axis(0)) {
            assert!((row.sum() - 1.0).abs() < 1e-12);
        }
        assert_eq!(model.hidden_size(), 2);
    }
}
