//! Mistake-driven perceptron, one-vs-rest.

use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::linear::{LinearModel, fit_one_vs_rest};
use super::{Classifier, DEFAULT_MODEL_SEED, FittedModel, ModelError, validate_training};

#[derive(Debug, Clone)]
pub struct Perceptron {
    pub epochs: usize,
    /// Step applied on each mistake.
    pub eta: f64,
    pub seed: u64,
}

impl Default for Perceptron {
    fn default() -> Self {
        Self {
            epochs: 50,
            eta: 1.0,
            seed: DEFAULT_MODEL_SEED,
        }
    }
}

impl Classifier for Perceptron {
    fn name(&self) -> &str {
        "perceptron"
    }

    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Box<dyn FittedModel>, ModelError> {
        let encoder = validate_training(x, y)?;
        let encoded = encoder.encode_all(y);
        let (weights, bias) = fit_one_vs_rest(x, &encoded, encoder.n_classes(), |x, t, class_idx| {
            // Each class gets its own shuffle stream so classes stay independent.
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

impl Perceptron {
    fn fit_binary(
        &self,
        x: ArrayView2<'_, f64>,
        targets: ArrayView1<'_, f64>,
        rng: &mut StdRng,
    ) -> (Array1<f64>, f64) {
        let mut w = Array1::<f64>::zeros(x.ncols());
        let mut b = 0.0f64;
        let mut order: Vec<usize> = (0..x.nrows()).collect();
        for _epoch in 0..self.epochs {
            order.shuffle(rng);
            let mut mistakes = 0usize;
            for &i in &order {
                let row = x.row(i);
                let t = targets[i];
                if t * (row.dot(&w) + b) <= 0.0 {
                    w.scaled_add(self.eta * t, &row);
                    b += self.eta * t;
                    mistakes += 1;
                }
            }
            if mistakes == 0 {
                break;
            }
        }
        (w, b)
    }
}
