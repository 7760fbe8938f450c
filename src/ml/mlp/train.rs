use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng, seq::SliceRandom};

use super::MlpModel;
use crate::ml::{LabelEncoder, softmax_inplace};

#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub hidden_size: usize,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub l2: f64,
    pub seed: u64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            hidden_size: 100,
            epochs: 100,
            batch_size: 32,
            learning_rate: 0.05,
            l2: 1e-4,
            seed: 42,
        }
    }
}

/// Train on `x` with labels `y` already validated against `encoder`.
pub fn train_mlp(
    x: ArrayView2<'_, f64>,
    encoder: LabelEncoder,
    y: ArrayView1<'_, f64>,
    options: &TrainOptions,
) -> MlpModel {
    let encoded = encoder.encode_all(y);
    let n_classes = encoder.n_classes();
    let d = x.ncols();
    let hidden = options.hidden_size.max(1);
    let batch_size = options.batch_size.max(1);
    let lr = options.learning_rate;
    let l2 = options.l2.max(0.0);

    let (feature_mean, feature_std) = feature_mean_std(x);
    let normalized = (&x - &feature_mean) / &feature_std;

    let mut rng = StdRng::seed_from_u64(options.seed);
    let scale1 = (6.0 / (d + hidden) as f64).sqrt();
    let scale2 = (6.0 / (hidden + n_classes) as f64).sqrt();
    let mut weights1 = Array2::from_shape_fn((hidden, d), |_| rng.random_range(-scale1..scale1));
    let mut weights2 =
        Array2::from_shape_fn((n_classes, hidden), |_| rng.random_range(-scale2..scale2));
    let mut bias1 = Array1::<f64>::zeros(hidden);
    let mut bias2 = Array1::<f64>::zeros(n_classes);

    let mut indices: Vec<usize> = (0..x.nrows()).collect();
    for _epoch in 0..options.epochs {
        indices.shuffle(&mut rng);
        for chunk in indices.chunks(batch_size) {
            let batch = normalized.select(Axis(0), chunk);
            let pre = batch.dot(&weights1.t()) + &bias1;
            let act = pre.mapv(|v| v.max(0.0));
            let mut d_logits = act.dot(&weights2.t()) + &bias2;
            for (mut row, &idx) in d_logits.axis_iter_mut(Axis(0)).zip(chunk) {
                if let Some(values) = row.as_slice_mut() {
                    softmax_inplace(values);
                }
                row[encoded[idx]] -= 1.0;
            }
            let inv = 1.0 / chunk.len() as f64;
            let grad_w2 = d_logits.t().dot(&act) * inv;
            let grad_b2 = d_logits.sum_axis(Axis(0)) * inv;
            let mut d_hidden = d_logits.dot(&weights2);
            d_hidden.zip_mut_with(&pre, |g, &p| {
                if p <= 0.0 {
                    *g = 0.0;
                }
            });
            let grad_w1 = d_hidden.t().dot(&batch) * inv;
            let grad_b1 = d_hidden.sum_axis(Axis(0)) * inv;

            weights1.zip_mut_with(&grad_w1, |w, &g| *w -= lr * (g + l2 * *w));
            bias1.zip_mut_with(&grad_b1, |b, &g| *b -= lr * g);
            weights2.zip_mut_with(&grad_w2, |w, &g| *w -= lr * (g + l2 * *w));
            bias2.zip_mut_with(&grad_b2, |b, &g| *b -= lr * g);
        }
    }

    MlpModel {
        encoder,
        feature_mean,
        feature_std,
        weights1,
        bias1,
        weights2,
        bias2,
    }
}

fn feature_mean_std(x: ArrayView2<'_, f64>) -> (Array1<f64>, Array1<f64>) {
    let mean = x
        .mean_axis(Axis(0))
        .unwrap_or_else(|| Array1::zeros(x.ncols()));
    let std = x
        .std_axis(Axis(0), 0.0)
        .mapv(|s| if s > 1e-12 { s } else { 1.0 });
    (mean, std)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn constant_columns_get_unit_scale() {
        let x = array![[1.0, 0.0], [1.0, 2.0]];
        let (mean, std) = feature_mean_std(x.view());
        assert_eq!(mean, array![1.0, 1.0]);
        assert_eq!(std, array![1.0, 1.0]);
    }

    #[test]
    fn same_seed_same_weights() {
        let x = array![[0.0, 1.0], [1.0, 0.0], [0.5, 0.4], [0.9, 0.2]];
        let y = array![0.0, 1.0, 0.0, 1.0];
        let options = TrainOptions {
            hidden_size: 4,
            epochs: 3,
            ..Default::default()
        };
        let a = train_mlp(x.view(), LabelEncoder::fit(y.view()), y.view(), &options);
        let b = train_mlp(x.view(), LabelEncoder::fit(y.view()), y.view(), &options);
        assert_eq!(a.weights1, b.weights1);
        assert_eq!(a.bias2, b.bias2);
    }
}
