//! Single-hidden-layer perceptron classifier.

mod model;
mod train;

pub use model::MlpModel;
pub use train::{TrainOptions, train_mlp};

use ndarray::{ArrayView1, ArrayView2};

use super::{Classifier, DEFAULT_MODEL_SEED, FittedModel, ModelError, validate_training};

/// ReLU hidden layer over standardized inputs, softmax output.
#[derive(Debug, Clone)]
pub struct MlpClassifier {
    pub hidden_size: usize,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub l2: f64,
    pub seed: u64,
}

impl Default for MlpClassifier {
    fn default() -> Self {
        let options = TrainOptions::default();
        Self {
            hidden_size: options.hidden_size,
            epochs: options.epochs,
            batch_size: options.batch_size,
            learning_rate: options.learning_rate,
            l2: options.l2,
            seed: DEFAULT_MODEL_SEED,
        }
    }
}

impl Classifier for MlpClassifier {
    fn name(&self) -> &str {
        "mlp"
    }

    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Box<dyn FittedModel>, ModelError> {
        let encoder = validate_training(x, y)?;
        let options = TrainOptions {
            hidden_size: self.hidden_size,
            epochs: self.epochs,
            batch_size: self.batch_size,
            learning_rate: self.learning_rate,
            l2: self.l2,
            seed: self.seed,
        };
        Ok(Box::new(train_mlp(x, encoder, y, &options)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn learns_xor() {
        let x = array![
            [0.0, 0.0],
            [0.0, 1.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.05, 0.0],
            [0.0, 0.95],
            [0.95, 0.05],
            [1.0, 0.95]
        ];
        let y = array![0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0];
        let mlp = MlpClassifier {
            hidden_size: 16,
            epochs: 2000,
            batch_size: 4,
            learning_rate: 0.3,
            ..Default::default()
        };
        let model = mlp.fit(x.view(), y.view()).unwrap();
        assert_eq!(model.name(), "mlp");
        assert_eq!(model.predict(x.view()), y);
    }
}
