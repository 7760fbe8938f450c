//! Evaluation metrics for classification and rating error.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Sorted distinct label values (NaN-free input assumed).
pub fn distinct_labels(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut labels: Vec<f64> = values.into_iter().collect();
    labels.sort_by(|a, b| a.total_cmp(b));
    labels.dedup();
    labels
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Confusion matrix over an explicit, sorted label set.
pub struct ConfusionMatrix {
    /// Label values indexing both rows (truth) and columns (predicted).
    pub labels: Vec<f64>,
    /// Row-major `KxK` counts (`truth * K + predicted`).
    pub counts: Vec<u32>,
}

impl ConfusionMatrix {
    /// Create an empty matrix for `labels` (must be sorted and distinct).
    pub fn new(labels: Vec<f64>) -> Self {
        let k = labels.len();
        Self {
            labels,
            counts: vec![0; k * k],
        }
    }

    /// Tally `actual` against `predicted` over the union of their labels.
    pub fn from_labels(actual: ArrayView1<'_, f64>, predicted: ArrayView1<'_, f64>) -> Self {
        let labels = distinct_labels(actual.iter().chain(predicted.iter()).copied());
        let mut cm = Self::new(labels);
        for (&truth, &guess) in actual.iter().zip(predicted.iter()) {
            cm.add(truth, guess);
        }
        cm
    }

    pub fn n_classes(&self) -> usize {
        self.labels.len()
    }

    fn index_of(&self, label: f64) -> Option<usize> {
        self.labels
            .binary_search_by(|probe| probe.total_cmp(&label))
            .ok()
    }

    /// Count one observation; labels outside the matrix are ignored.
    pub fn add(&mut self, truth: f64, predicted: f64) {
        let (Some(t), Some(p)) = (self.index_of(truth), self.index_of(predicted)) else {
            return;
        };
        let idx = t * self.n_classes() + p;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    /// Count at `(truth_index, predicted_index)`.
    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth * self.n_classes() + predicted]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Rows of the matrix, truth-major.
    pub fn rows(&self) -> Vec<Vec<u32>> {
        let k = self.n_classes();
        self.counts.chunks(k.max(1)).map(|row| row.to_vec()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Precision/recall statistics for a single class.
pub struct PerClassStats {
    pub label: f64,
    /// `TP / (TP + FP)`.
    pub precision: f64,
    /// `TP / (TP + FN)`.
    pub recall: f64,
    /// Total number of true examples for the class.
    pub support: u32,
}

/// Compute per-class precision and recall from a confusion matrix.
pub fn precision_recall_by_class(cm: &ConfusionMatrix) -> Vec<PerClassStats> {
    let k = cm.n_classes();
    let mut stats = Vec::with_capacity(k);
    for class_idx in 0..k {
        let tp = cm.get(class_idx, class_idx) as f64;
        let mut fp = 0f64;
        let mut fn_ = 0f64;
        let mut support = 0u32;
        for j in 0..k {
            let v = cm.get(class_idx, j);
            support = support.saturating_add(v);
            if j != class_idx {
                fn_ += v as f64;
            }
        }
        for i in 0..k {
            if i != class_idx {
                fp += cm.get(i, class_idx) as f64;
            }
        }
        let precision = if tp + fp == 0.0 { 0.0 } else { tp / (tp + fp) };
        let recall = if tp + fn_ == 0.0 { 0.0 } else { tp / (tp + fn_) };
        stats.push(PerClassStats {
            label: cm.labels[class_idx],
            precision,
            recall,
            support,
        });
    }
    stats
}

/// Compute overall accuracy from a confusion matrix.
pub fn accuracy(cm: &ConfusionMatrix) -> f64 {
    let total = cm.total();
    if total == 0 {
        return 0.0;
    }
    let correct: u64 = (0..cm.n_classes()).map(|i| cm.get(i, i) as u64).sum();
    correct as f64 / total as f64
}

/// Fraction of positions where `predicted` equals `actual`.
pub fn accuracy_score(actual: ArrayView1<'_, f64>, predicted: ArrayView1<'_, f64>) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let correct = actual
        .iter()
        .zip(predicted.iter())
        .filter(|(a, p)| a == p)
        .count();
    correct as f64 / actual.len() as f64
}

pub fn mean_absolute_error(actual: ArrayView1<'_, f64>, predicted: ArrayView1<'_, f64>) -> f64 {
    mean_of(actual, predicted, |diff| diff.abs())
}

pub fn mean_squared_error(actual: ArrayView1<'_, f64>, predicted: ArrayView1<'_, f64>) -> f64 {
    mean_of(actual, predicted, |diff| diff * diff)
}

/// Root-mean-squared error, the selection criterion.
pub fn root_mean_squared_error(
    actual: ArrayView1<'_, f64>,
    predicted: ArrayView1<'_, f64>,
) -> f64 {
    mean_squared_error(actual, predicted).sqrt()
}

fn mean_of(
    actual: ArrayView1<'_, f64>,
    predicted: ArrayView1<'_, f64>,
    loss: impl Fn(f64) -> f64,
) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let total: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| loss(a - p))
        .sum();
    total / actual.len() as f64
}

/// Per-label counts of actual vs predicted values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionComparison {
    pub labels: Vec<f64>,
    pub actual_counts: Vec<usize>,
    pub predicted_counts: Vec<usize>,
}

impl DistributionComparison {
    pub fn from_labels(actual: ArrayView1<'_, f64>, predicted: ArrayView1<'_, f64>) -> Self {
        let labels = distinct_labels(actual.iter().chain(predicted.iter()).copied());
        let count = |values: ArrayView1<'_, f64>| -> Vec<usize> {
            labels
                .iter()
                .map(|label| values.iter().filter(|&&v| v == *label).count())
                .collect()
        };
        Self {
            actual_counts: count(actual),
            predicted_counts: count(predicted),
            labels,
        }
    }
}
