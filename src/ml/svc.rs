//! Linear support-vector classifier (one-vs-rest, squared hinge loss).

use ndarray::{Array1, ArrayView1, ArrayView2};

use super::linear::{LinearModel, fit_one_vs_rest};
use super::{Classifier, FittedModel, ModelError, validate_training};

/// Full-batch gradient descent on `||w||² / 2C + Σ max(0, 1 - t·f(x))²`,
/// averaged over samples.
#[derive(Debug, Clone)]
pub struct LinearSvc {
    /// Inverse regularization strength.
    pub c: f64,
    pub epochs: usize,
    pub learning_rate: f64,
}

impl Default for LinearSvc {
    fn default() -> Self {
        Self {
            c: 1.0,
            epochs: 200,
            learning_rate: 0.1,
        }
    }
}

impl Classifier for LinearSvc {
    fn name(&self) -> &str {
        "linear_svc"
    }

    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Box<dyn FittedModel>, ModelError> {
        let encoder = validate_training(x, y)?;
        let encoded = encoder.encode_all(y);
        let (weights, bias) = fit_one_vs_rest(x, &encoded, encoder.n_classes(), |x, t, _| {
            self.fit_binary(x, t)
        });
        Ok(Box::new(LinearModel {
            name: self.name().to_string(),
            encoder,
            weights,
            bias,
        }))
    }
}

impl LinearSvc {
    fn fit_binary(&self, x: ArrayView2<'_, f64>, targets: ArrayView1<'_, f64>) -> (Array1<f64>, f64) {
        let n = x.nrows() as f64;
        let reg = 1.0 / (self.c.max(1e-12) * n);
        let lr = self.learning_rate;
        let mut w = Array1::<f64>::zeros(x.ncols());
        let mut b = 0.0f64;

        for _epoch in 0..self.epochs {
            let scores = x.dot(&w) + b;
            // d(loss)/d(score) per sample; zero outside the margin.
            let coef: Array1<f64> = scores
                .iter()
                .zip(targets.iter())
                .map(|(&s, &t)| {
                    let margin = t * s;
                    if margin < 1.0 {
                        -2.0 * (1.0 - margin) * t / n
                    } else {
                        0.0
                    }
                })
                .collect();
            let grad_w = x.t().dot(&coef);
            let grad_b = coef.sum();
            w.zip_mut_with(&grad_w, |wi, &g| *wi -= lr * (g + reg * *wi));
            b -= lr * grad_b;
        }
        (w, b)
    }
}
