//! Lowest-RMSE model selection over a classifier roster.
//!
//! The sweep fits every roster entry on the same seeded training partition,
//! scores each on the held-out rows, and keeps the first candidate with the
//! strictly lowest RMSE. Candidates are evaluated sequentially or on the rayon
//! pool; either way the fold runs in roster order, so both paths pick the same
//! winner.

pub mod report;

use ndarray::{Array1, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::dataset::{Dataset, SplitError, TrainTestSplit, train_test_split};
use crate::ml::metrics::{
    self, ConfusionMatrix, DistributionComparison, distinct_labels, precision_recall_by_class,
};
use crate::ml::{Classifier, FittedModel, ModelError};

pub use report::{SelectionReport, render_summary};

/// RMSE a candidate must beat to become the first best model.
pub const SENTINEL_RMSE: f64 = f64::MAX;

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("Dataset has no rows")]
    EmptyDataset,
    #[error("Roster has no classifiers")]
    EmptyRoster,
    #[error("Label column not found: {0}")]
    MissingLabel(String),
    #[error("Dataset has no feature columns besides {0}")]
    NoFeatures(String),
    #[error("Invalid train/test split: {0}")]
    Split(#[from] SplitError),
    #[error("Failed to fit {model}: {source}")]
    Fit {
        model: String,
        #[source]
        source: ModelError,
    },
    #[error("No candidate produced a finite RMSE")]
    NoCandidate,
}

/// Knobs for one sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionOptions {
    pub test_fraction: f64,
    pub seed: u64,
    pub parallel: bool,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            test_fraction: 0.25,
            seed: 0,
            parallel: false,
        }
    }
}

/// Held-out score of one roster entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    /// Position in the roster.
    pub index: usize,
    pub name: String,
    pub rmse: f64,
    pub accuracy: f64,
}

/// Error and accuracy of the winning model on the test rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub accuracy: f64,
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
}

/// Extra report for two-valued labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryReport {
    /// The larger of the two label values.
    pub positive_label: f64,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub confusion: ConfusionMatrix,
}

#[derive(Debug)]
pub struct SelectionResult {
    pub best_index: usize,
    pub best_name: String,
    pub model: Box<dyn FittedModel>,
    /// Predictions of the best model on the test rows.
    pub predictions: Array1<f64>,
    /// True labels of the test rows.
    pub actual: Array1<f64>,
    pub metrics: SummaryMetrics,
    /// Every candidate in roster order.
    pub candidates: Vec<CandidateScore>,
    pub n_train: usize,
    pub n_test: usize,
    /// Set when the whole label column has exactly two distinct values.
    pub binary: Option<BinaryReport>,
    /// Set when the whole label column has more than two distinct values.
    pub distribution: Option<DistributionComparison>,
}

struct Evaluated {
    score: CandidateScore,
    model: Box<dyn FittedModel>,
}

/// Fit every classifier in `roster` and return the one with the lowest
/// held-out RMSE.
pub fn select_best(
    dataset: &Dataset,
    label_column: &str,
    roster: &[Box<dyn Classifier>],
    options: &SelectionOptions,
) -> Result<SelectionResult, SelectionError> {
    if dataset.is_empty() {
        return Err(SelectionError::EmptyDataset);
    }
    if roster.is_empty() {
        return Err(SelectionError::EmptyRoster);
    }
    if dataset.column_index(label_column).is_none() {
        return Err(SelectionError::MissingLabel(label_column.to_string()));
    }
    let (x, y) = dataset
        .features_and_label(label_column)
        .map_err(|_| SelectionError::MissingLabel(label_column.to_string()))?;
    if x.ncols() == 0 {
        return Err(SelectionError::NoFeatures(label_column.to_string()));
    }
    let split = train_test_split(x.view(), y.view(), options.test_fraction, options.seed)?;
    info!(
        train = split.train_rows.len(),
        test = split.test_rows.len(),
        features = x.ncols(),
        candidates = roster.len(),
        "Starting model sweep"
    );

    let evaluated: Vec<Evaluated> = if options.parallel {
        roster
            .par_iter()
            .enumerate()
            .map(|(index, classifier)| evaluate(index, classifier.as_ref(), &split))
            .collect::<Result<_, _>>()?
    } else {
        roster
            .iter()
            .enumerate()
            .map(|(index, classifier)| evaluate(index, classifier.as_ref(), &split))
            .collect::<Result<_, _>>()?
    };
    let candidates: Vec<CandidateScore> = evaluated.iter().map(|e| e.score.clone()).collect();

    let best = evaluated
        .into_iter()
        .fold(None::<Evaluated>, |best, candidate| {
            let best_rmse = best.as_ref().map_or(SENTINEL_RMSE, |b| b.score.rmse);
            if candidate.score.rmse < best_rmse {
                Some(candidate)
            } else {
                best
            }
        })
        .ok_or(SelectionError::NoCandidate)?;

    let predictions = best.model.predict(split.x_test.view());
    let actual = split.y_test.clone();
    let metrics = summary_metrics(actual.view(), predictions.view());
    info!(
        model = %best.score.name,
        rmse = metrics.rmse,
        accuracy = metrics.accuracy,
        "Selected best model"
    );

    let label_values = distinct_labels(y.iter().copied());
    let (binary, distribution) = match label_values.len() {
        2 => (
            Some(binary_report(
                label_values[1],
                &label_values,
                actual.view(),
                predictions.view(),
            )),
            None,
        ),
        n if n > 2 => (
            None,
            Some(DistributionComparison::from_labels(
                actual.view(),
                predictions.view(),
            )),
        ),
        _ => (None, None),
    };

    Ok(SelectionResult {
        best_index: best.score.index,
        best_name: best.score.name,
        model: best.model,
        predictions,
        actual,
        metrics,
        candidates,
        n_train: split.train_rows.len(),
        n_test: split.test_rows.len(),
        binary,
        distribution,
    })
}

fn evaluate(
    index: usize,
    classifier: &dyn Classifier,
    split: &TrainTestSplit,
) -> Result<Evaluated, SelectionError> {
    let name = classifier.name().to_string();
    let model = classifier
        .fit(split.x_train.view(), split.y_train.view())
        .map_err(|source| SelectionError::Fit {
            model: name.clone(),
            source,
        })?;
    let predicted = model.predict(split.x_test.view());
    let rmse = metrics::root_mean_squared_error(split.y_test.view(), predicted.view());
    let accuracy = metrics::accuracy_score(split.y_test.view(), predicted.view());
    debug!(model = %name, rmse, accuracy, "Evaluated candidate");
    Ok(Evaluated {
        score: CandidateScore {
            index,
            name,
            rmse,
            accuracy,
        },
        model,
    })
}

fn summary_metrics(actual: ArrayView1<'_, f64>, predicted: ArrayView1<'_, f64>) -> SummaryMetrics {
    SummaryMetrics {
        accuracy: metrics::accuracy_score(actual, predicted),
        mae: metrics::mean_absolute_error(actual, predicted),
        mse: metrics::mean_squared_error(actual, predicted),
        rmse: metrics::root_mean_squared_error(actual, predicted),
    }
}

fn binary_report(
    positive_label: f64,
    label_values: &[f64],
    actual: ArrayView1<'_, f64>,
    predicted: ArrayView1<'_, f64>,
) -> BinaryReport {
    let labels = distinct_labels(label_values.iter().chain(predicted.iter()).copied());
    let mut confusion = ConfusionMatrix::new(labels);
    for (&truth, &guess) in actual.iter().zip(predicted.iter()) {
        confusion.add(truth, guess);
    }
    let (precision, recall) = precision_recall_by_class(&confusion)
        .into_iter()
        .find(|stats| stats.label == positive_label)
        .map_or((0.0, 0.0), |stats| (stats.precision, stats.recall));
    BinaryReport {
        positive_label,
        accuracy: metrics::accuracy(&confusion),
        precision,
        recall,
        confusion,
    }
}
