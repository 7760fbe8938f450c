//! Stochastic gradient descent classifier (hinge loss, L2, one-vs-rest).

use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::linear::{LinearModel, fit_one_vs_rest};
use super::{Classifier, DEFAULT_MODEL_SEED, FittedModel, ModelError, validate_training};

/// Per-sample hinge-loss updates with learning rate `eta0 / (1 + alpha·eta0·t)`.
#[derive(Debug, Clone)]
pub struct SgdClassifier {
    /// L2 regularization strength.
    pub alpha: f64,
    pub eta0: f64,
    pub epochs: usize,
    pub seed: u64,
}

impl Default for SgdClassifier {
    fn default() -> Self {
        Self {
            alpha: 1e-4,
            eta0: 0.1,
            epochs: 20,
            seed: DEFAULT_MODEL_SEED,
        }
    }
}

impl Classifier for SgdClassifier {
    fn name(&self) -> &str {
        "sgd"
    }

    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Box<dyn FittedModel>, ModelError> {
        let encoder = validate_training(x, y)?;
        let encoded = encoder.encode_all(y);
        let (weights, bias) = fit_one_vs_rest(x, &encoded, encoder.n_classes(), |x, t, class_idx| {
            let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(class_idx as u64));
            self.fit_binary(x, t, &mut rng)
        });
        Ok(Box::new(LinearModel {
            name: self.name().to_string(),
            encoder,
            weights,
            bias,
        }))
    }
}

impl SgdClassifier {
    fn fit_binary(
        &self,
        x: ArrayView2<'_, f64>,
        targets: ArrayView1<'_, f64>,
        rng: &mut StdRng,
    ) -> (Array1<f64>, f64) {
        let mut w = Array1::<f64>::zeros(x.ncols());
        let mut b = 0.0f64;
        let mut order: Vec<usize> = (0..x.nrows()).collect();
        let alpha = self.alpha.max(0.0);
        let mut step = 0usize;
        for _epoch in 0..self.epochs {
            order.shuffle(rng);
            for &i in &order {
                let eta = self.eta0 / (1.0 + alpha * self.eta0 * step as f64);
                step += 1;
                let row = x.row(i);
                let t = targets[i];
                let margin = t * (row.dot(&w) + b);
                w *= 1.0 - eta * alpha;
                if margin < 1.0 {
                    w.scaled_add(eta * t, &row);
                    b += eta * t;
                }
            }
        }
        (w, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn separates_binary_clusters() {
        let x = array![
            [1.0, 0.0],
            [0.9, 0.2],
            [0.8, 0.1],
            [0.0, 1.0],
            [0.1, 0.9],
            [0.2, 0.8]
        ];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let model = SgdClassifier::default().fit(x.view(), y.view()).unwrap();
        assert_eq!(model.name(), "sgd");
        assert_eq!(model.predict(x.view()), y);
    }
}
