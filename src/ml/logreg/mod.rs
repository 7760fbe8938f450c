//! Multinomial logistic regression.

use ndarray::{ArrayView1, ArrayView2};

use super::linear::LinearModel;
use super::{Classifier, DEFAULT_MODEL_SEED, FittedModel, ModelError, validate_training};

mod train;
pub use train::{TrainOptions, train_logreg};

/// Softmax regression trained with mini-batch gradient descent.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    pub epochs: usize,
    pub learning_rate: f64,
    pub l2: f64,
    pub batch_size: usize,
    pub seed: u64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        let options = TrainOptions::default();
        Self {
            epochs: options.epochs,
            learning_rate: options.learning_rate,
            l2: options.l2,
            batch_size: options.batch_size,
            seed: DEFAULT_MODEL_SEED,
        }
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        "logistic_regression"
    }

    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Box<dyn FittedModel>, ModelError> {
        let encoder = validate_training(x, y)?;
        let encoded = encoder.encode_all(y);
        let options = TrainOptions {
            epochs: self.epochs,
            learning_rate: self.learning_rate,
            l2: self.l2,
            batch_size: self.batch_size,
            seed: self.seed,
        };
        let (weights, bias) = train_logreg(x, &encoded, encoder.n_classes(), &options);
        Ok(Box::new(LinearModel {
            name: self.name().to_string(),
            encoder,
            weights,
            bias,
        }))
    }
}
