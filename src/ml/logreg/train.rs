use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::ml::softmax_inplace;

/// Training options for softmax regression.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub epochs: usize,
    pub learning_rate: f64,
    pub l2: f64,
    pub batch_size: usize,
    pub seed: u64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            epochs: 100,
            learning_rate: 0.5,
            l2: 1e-4,
            batch_size: 64,
            seed: 42,
        }
    }
}

/// Fit softmax weights `[n_classes, n_features]` and biases `[n_classes]`.
///
/// `encoded` holds class indices aligned with the rows of `x`.
pub fn train_logreg(
    x: ArrayView2<'_, f64>,
    encoded: &[usize],
    n_classes: usize,
    options: &TrainOptions,
) -> (Array2<f64>, Array1<f64>) {
    let dim = x.ncols();
    let mut weights = Array2::<f64>::zeros((n_classes, dim));
    let mut bias = Array1::<f64>::zeros(n_classes);
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut indices: Vec<usize> = (0..x.nrows()).collect();
    let batch_size = options.batch_size.max(1);
    let lr = options.learning_rate;
    let l2 = options.l2.max(0.0);

    for _epoch in 0..options.epochs {
        indices.shuffle(&mut rng);
        for chunk in indices.chunks(batch_size) {
            let batch = x.select(Axis(0), chunk);
            let mut probs = batch.dot(&weights.t()) + &bias;
            for (mut row, &idx) in probs.axis_iter_mut(Axis(0)).zip(chunk) {
                if let Some(values) = row.as_slice_mut() {
                    softmax_inplace(values);
                }
                row[encoded[idx]] -= 1.0;
            }
            // probs now holds dL/dlogits for the batch.
            let inv = 1.0 / chunk.len() as f64;
            let grad_w = probs.t().dot(&batch) * inv;
            let grad_b = probs.sum_axis(Axis(0)) * inv;
            weights.zip_mut_with(&grad_w, |w, &g| *w -= lr * (g + l2 * *w));
            bias.zip_mut_with(&grad_b, |b, &g| *b -= lr * g);
        }
    }
    (weights, bias)
}
