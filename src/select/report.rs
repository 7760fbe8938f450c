//! Human-readable and JSON renderings of a [`SelectionResult`].

use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{BinaryReport, CandidateScore, SelectionResult, SummaryMetrics};
use crate::ml::metrics::DistributionComparison;

/// Serializable snapshot of a sweep, written as `report.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionReport {
    pub best_model: String,
    pub best_index: usize,
    pub metrics: SummaryMetrics,
    pub n_train: usize,
    pub n_test: usize,
    pub candidates: Vec<CandidateScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<BinaryReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<DistributionComparison>,
}

impl From<&SelectionResult> for SelectionReport {
    fn from(result: &SelectionResult) -> Self {
        Self {
            best_model: result.best_name.clone(),
            best_index: result.best_index,
            metrics: result.metrics,
            n_train: result.n_train,
            n_test: result.n_test,
            candidates: result.candidates.clone(),
            binary: result.binary.clone(),
            distribution: result.distribution.clone(),
        }
    }
}

impl SelectionReport {
    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let data = serde_json::to_vec_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, data)
    }
}

/// Plain-text summary of the winning model.
pub fn render_summary(result: &SelectionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Best build model is: {}", result.best_name);
    let _ = writeln!(
        out,
        "Build model score (Accuracy): {:.4}",
        result.metrics.accuracy
    );
    let _ = writeln!(out, "MAE = {:5.4}", result.metrics.mae);
    let _ = writeln!(out, "MSE = {:5.4}", result.metrics.mse);
    let _ = writeln!(out, "RMSE = {:5.4}", result.metrics.rmse);

    let _ = writeln!(out, "candidates (rmse, accuracy):");
    for candidate in &result.candidates {
        let marker = if candidate.index == result.best_index {
            "*"
        } else {
            " "
        };
        let _ = writeln!(
            out,
            "{marker} {:<20} rmse={:.4} accuracy={:.4}",
            candidate.name, candidate.rmse, candidate.accuracy
        );
    }

    if let Some(binary) = &result.binary {
        let _ = writeln!(out, "Accuracy: {:.4}", binary.accuracy);
        let _ = writeln!(out, "Precision: {:.4}", binary.precision);
        let _ = writeln!(out, "Recall: {:.4}", binary.recall);
        let _ = writeln!(out, "confusion matrix (rows=true, cols=pred):");
        let k = binary.confusion.n_classes();
        for truth in 0..k {
            let mut row = String::new();
            for pred in 0..k {
                let _ = write!(row, "{:6}", binary.confusion.get(truth, pred));
            }
            let _ = writeln!(out, "{row}");
        }
    }

    if let Some(dist) = &result.distribution {
        let _ = writeln!(out, "label  actual  predicted");
        for ((label, actual), predicted) in dist
            .labels
            .iter()
            .zip(&dist.actual_counts)
            .zip(&dist.predicted_counts)
        {
            let _ = writeln!(out, "{label:>5}  {actual:>6}  {predicted:>9}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::metrics::ConfusionMatrix;
    use crate::ml::{FittedModel, naive_bayes::GaussianNb, Classifier};
    use ndarray::array;

    fn sample_result() -> SelectionResult {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let y = array![0.0, 0.0, 1.0, 1.0];
        let model: Box<dyn FittedModel> = GaussianNb::default().fit(x.view(), y.view()).unwrap();
        let mut confusion = ConfusionMatrix::new(vec![0.0, 1.0]);
        confusion.add(0.0, 0.0);
        confusion.add(1.0, 1.0);
        SelectionResult {
            best_index: 1,
            best_name: "gaussian_nb".into(),
            model,
            predictions: array![0.0, 1.0],
            actual: array![0.0, 1.0],
            metrics: SummaryMetrics {
                accuracy: 1.0,
                mae: 0.0,
                mse: 0.0,
                rmse: 0.0,
            },
            candidates: vec![
                CandidateScore {
                    index: 0,
                    name: "perceptron".into(),
                    rmse: 0.5,
                    accuracy: 0.75,
                },
                CandidateScore {
                    index: 1,
                    name: "gaussian_nb".into(),
                    rmse: 0.0,
                    accuracy: 1.0,
                },
            ],
            n_train: 2,
            n_test: 2,
            binary: Some(BinaryReport {
                positive_label: 1.0,
                accuracy: 1.0,
                precision: 1.0,
                recall: 1.0,
                confusion,
            }),
            distribution: None,
        }
    }

    #[test]
    fn summary_names_winner_and_metrics() {
        let text = render_summary(&sample_result());
        assert!(text.starts_with("Best build model is: gaussian_nb\n"));
        assert!(text.contains("RMSE = 0.0000"));
        assert!(text.contains("* gaussian_nb"));
        assert!(text.contains("Precision: 1.0000"));
    }

    #[test]
    fn json_report_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = SelectionReport::from(&sample_result());
        report.write_json(&path).unwrap();
        let loaded: SelectionReport =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(loaded, report);
        assert!(loaded.distribution.is_none());
    }
}
