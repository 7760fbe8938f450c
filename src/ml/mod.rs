//! Classifiers used by the model selection sweep.
//!
//! Every model implements the same two-step contract: a [`Classifier`] holds
//! hyperparameters and fits on a feature matrix, producing a
//! [`FittedModel`] that predicts label values and scores accuracy. Labels are
//! plain `f64` values (star ratings or 0/1 flags); each model encodes them
//! into sorted class indices internally.

use std::fmt;

use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod forest;
pub mod linear;
pub mod logreg;
pub mod metrics;
pub mod mlp;
pub mod naive_bayes;
pub mod perceptron;
pub mod sgd;
pub mod svc;
pub mod tree;

/// Seed used by the default roster so repeated sweeps are reproducible.
pub const DEFAULT_MODEL_SEED: u64 = 42;

/// Errors raised while fitting a classifier.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Empty training set")]
    EmptyTrainingSet,
    #[error("Feature rows ({features}) and labels ({labels}) differ in length")]
    LengthMismatch { features: usize, labels: usize },
    #[error("Need at least 2 classes, found {0}")]
    TooFewClasses(usize),
    #[error("Feature matrix has no columns")]
    NoFeatures,
    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),
}

/// Trainable model description.
pub trait Classifier: Send + Sync {
    /// Display name used in reports.
    fn name(&self) -> &str;

    /// Fit on `x` (rows = samples) against label values `y`.
    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Box<dyn FittedModel>, ModelError>;
}

/// A trained model that can label new rows.
pub trait FittedModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Predict one label value per row of `x`.
    fn predict(&self, x: ArrayView2<'_, f64>) -> Array1<f64>;

    /// Fraction of rows whose predicted label equals the true label.
    fn score(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
        let predicted = self.predict(x);
        metrics::accuracy_score(y, predicted.view())
    }
}

/// The built-in classifier kinds, in default roster order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LogisticRegression,
    LinearSvc,
    Mlp,
    DecisionTree,
    RandomForest,
    GaussianNb,
    Perceptron,
    Sgd,
}

impl ModelKind {
    /// Default roster order.
    pub const ALL: [ModelKind; 8] = [
        ModelKind::LogisticRegression,
        ModelKind::LinearSvc,
        ModelKind::Mlp,
        ModelKind::DecisionTree,
        ModelKind::RandomForest,
        ModelKind::GaussianNb,
        ModelKind::Perceptron,
        ModelKind::Sgd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::LogisticRegression => "logistic_regression",
            ModelKind::LinearSvc => "linear_svc",
            ModelKind::Mlp => "mlp",
            ModelKind::DecisionTree => "decision_tree",
            ModelKind::RandomForest => "random_forest",
            ModelKind::GaussianNb => "gaussian_nb",
            ModelKind::Perceptron => "perceptron",
            ModelKind::Sgd => "sgd",
        }
    }

    /// Parse a snake_case kind name.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// Instantiate the classifier with default hyperparameters.
    pub fn build(self, seed: u64) -> Box<dyn Classifier> {
        match self {
            ModelKind::LogisticRegression => Box::new(logreg::LogisticRegression {
                seed,
                ..Default::default()
            }),
            ModelKind::LinearSvc => Box::new(svc::LinearSvc::default()),
            ModelKind::Mlp => Box::new(mlp::MlpClassifier {
                seed,
                ..Default::default()
            }),
            ModelKind::DecisionTree => Box::new(tree::DecisionTree {
                seed,
                ..Default::default()
            }),
            ModelKind::RandomForest => Box::new(forest::RandomForest {
                seed,
                ..Default::default()
            }),
            ModelKind::GaussianNb => Box::new(naive_bayes::GaussianNb::default()),
            ModelKind::Perceptron => Box::new(perceptron::Perceptron {
                seed,
                ..Default::default()
            }),
            ModelKind::Sgd => Box::new(sgd::SgdClassifier {
                seed,
                ..Default::default()
            }),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build classifiers for `kinds`, preserving order.
pub fn roster(kinds: &[ModelKind]) -> Vec<Box<dyn Classifier>> {
    kinds
        .iter()
        .map(|kind| kind.build(DEFAULT_MODEL_SEED))
        .collect()
}

/// The eight-member default roster.
pub fn default_roster() -> Vec<Box<dyn Classifier>> {
    roster(&ModelKind::ALL)
}

/// Maps label values to dense class indices in ascending label order.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEncoder {
    classes: Vec<f64>,
}

impl LabelEncoder {
    /// Collect the distinct labels of `y`.
    pub fn fit(y: ArrayView1<'_, f64>) -> Self {
        Self {
            classes: metrics::distinct_labels(y.iter().copied()),
        }
    }

    pub fn classes(&self) -> &[f64] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn encode(&self, label: f64) -> Option<usize> {
        self.classes
            .binary_search_by(|probe| probe.total_cmp(&label))
            .ok()
    }

    /// Encode every label; only valid for labels seen by [`LabelEncoder::fit`].
    pub fn encode_all(&self, y: ArrayView1<'_, f64>) -> Vec<usize> {
        y.iter()
            .map(|&label| self.encode(label).unwrap_or(0))
            .collect()
    }

    pub fn decode(&self, index: usize) -> f64 {
        self.classes[index]
    }
}

/// Shared input checks, returning the label encoder on success.
pub(crate) fn validate_training(
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
) -> Result<LabelEncoder, ModelError> {
    if x.nrows() == 0 || y.is_empty() {
        return Err(ModelError::EmptyTrainingSet);
    }
    if x.nrows() != y.len() {
        return Err(ModelError::LengthMismatch {
            features: x.nrows(),
            labels: y.len(),
        });
    }
    if x.ncols() == 0 {
        return Err(ModelError::NoFeatures);
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::NonFinite("features"));
    }
    if y.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::NonFinite("labels"));
    }
    let encoder = LabelEncoder::fit(y);
    if encoder.n_classes() < 2 {
        return Err(ModelError::TooFewClasses(encoder.n_classes()));
    }
    Ok(encoder)
}

/// Index of the largest value; the first wins on ties.
pub(crate) fn argmax<'a>(values: impl IntoIterator<Item = &'a f64>) -> usize {
    let mut best_idx = 0usize;
    let mut best_val = f64::NEG_INFINITY;
    for (idx, &v) in values.into_iter().enumerate() {
        if v > best_val {
            best_val = v;
            best_idx = idx;
        }
    }
    best_idx
}

/// Numerically-stable softmax over one row of logits.
pub(crate) fn softmax_inplace(values: &mut [f64]) {
    if values.is_empty() {
        return;
    }
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for v in values.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    if sum == 0.0 || !sum.is_finite() {
        let uniform = 1.0 / values.len() as f64;
        values.iter_mut().for_each(|v| *v = uniform);
        return;
    }
    values.iter_mut().for_each(|v| *v /= sum);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn encoder_sorts_and_round_trips_labels() {
        let y = array![5.0, 1.0, 3.0, 1.0, 5.0];
        let encoder = LabelEncoder::fit(y.view());
        assert_eq!(encoder.classes(), &[1.0, 3.0, 5.0]);
        assert_eq!(encoder.encode(3.0), Some(1));
        assert_eq!(encoder.encode(2.0), None);
        assert_eq!(encoder.encode_all(y.view()), vec![2, 0, 1, 0, 2]);
        assert_eq!(encoder.decode(2), 5.0);
    }

    #[test]
    fn validation_rejects_single_class() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 1.0];
        assert_eq!(
            validate_training(x.view(), y.view()).unwrap_err(),
            ModelError::TooFewClasses(1)
        );
    }

    #[test]
    fn validation_rejects_mismatched_lengths() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![0.0, 1.0];
        assert_eq!(
            validate_training(x.view(), y.view()).unwrap_err(),
            ModelError::LengthMismatch {
                features: 3,
                labels: 2
            }
        );
    }

    #[test]
    fn kind_names_parse_back() {
        for kind in ModelKind::ALL {
            assert_eq!(ModelKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ModelKind::parse("Random-Forest"), Some(ModelKind::RandomForest));
        assert_eq!(ModelKind::parse("knn"), None);
    }

    #[test]
    fn default_roster_follows_kind_order() {
        let names: Vec<String> = default_roster()
            .iter()
            .map(|model| model.name().to_string())
            .collect();
        let expected: Vec<String> = ModelKind::ALL
            .iter()
            .map(|kind| kind.as_str().to_string())
            .collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn softmax_sums_to_one() {
        let mut logits = [1.0, 2.0, 3.0];
        softmax_inplace(&mut logits);
        let sum: f64 = logits.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(logits[2] > logits[1] && logits[1] > logits[0]);
    }
}
