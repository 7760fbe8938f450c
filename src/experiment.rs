//! End-to-end review experiment.
//!
//! Loads reviews, builds a term representation and (optionally) a PCA
//! component representation, then runs the model sweep for each rating
//! target against each representation. Every run writes `report.json` plus
//! plots to `<output_dir>/<target>-<representation>/`.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ExperimentConfig;
use crate::dataset::{Dataset, DatasetError, Target};
use crate::ml;
use crate::plot::{self, PlotError};
use crate::reduction::{self, ReductionError, VarianceProfile};
use crate::reviews::{self, BrandSummary, ReviewLoadError};
use crate::select::{self, SelectionError, SelectionReport, SelectionResult};
use crate::text::{DictionaryError, TermMatrix, TfidfVectorizer, VocabularyFilter};

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error(transparent)]
    Reviews(#[from] ReviewLoadError),
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Reduction(#[from] ReductionError),
    #[error("{target}-{representation}: {source}")]
    Selection {
        target: Target,
        representation: Representation,
        #[source]
        source: SelectionError,
    },
    #[error(transparent)]
    Plot(#[from] PlotError),
    #[error("Vocabulary filter left no terms")]
    EmptyVocabulary,
    #[error("Unable to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write report {path}: {source}")]
    WriteReport {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Feature space the selector runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    /// Filtered TF-IDF term weights.
    Terms,
    /// PCA components of the term weights.
    Components,
}

impl Representation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Representation::Terms => "terms",
            Representation::Components => "components",
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct RunSummary {
    pub target: Target,
    pub representation: Representation,
    pub output_dir: PathBuf,
    pub result: SelectionResult,
}

#[derive(Debug)]
pub struct ExperimentOutcome {
    pub brands: Vec<BrandSummary>,
    pub n_reviews: usize,
    pub n_terms: usize,
    pub n_terms_kept: usize,
    pub variance: Option<VarianceProfile>,
    pub runs: Vec<RunSummary>,
}

pub fn run_experiment(config: &ExperimentConfig) -> Result<ExperimentOutcome, ExperimentError> {
    let label = config.columns.rating.as_str();
    let reviews = reviews::load_reviews(&config.input, &config.columns)?;
    let brands = reviews::brand_summary(&reviews);
    info!(
        reviews = reviews.len(),
        brands = brands.len(),
        path = %config.input.display(),
        "Loaded reviews"
    );
    for brand in &brands {
        info!(
            brand = %brand.brand,
            mean_rating = format!("{:.3}", brand.mean_rating),
            reviews = brand.reviews,
            "Brand summary"
        );
    }

    let texts: Vec<&str> = reviews.iter().map(|review| review.text.as_str()).collect();
    let (_, matrix) = TfidfVectorizer::fit_transform(&texts);
    let n_terms = matrix.n_terms();
    let filter = VocabularyFilter::from_settings(&config.vocabulary)?;
    let filtered = without_term(filter.apply(&matrix), label);
    if filtered.n_terms() == 0 {
        return Err(ExperimentError::EmptyVocabulary);
    }
    let n_terms_kept = filtered.n_terms();
    let ratings = reviews::ratings(&reviews);

    let mut representations = Vec::with_capacity(2);
    let mut variance = None;
    if config.reduction.enabled {
        let reduced = reduction::reduce(
            filtered.values.view(),
            config.reduction.variance_target,
            config.reduction.max_components,
        )?;
        representations.push((Representation::Components, reduced.components));
        variance = Some(reduced.profile);
    }
    representations.insert(0, (Representation::Terms, filtered.into_dataset()?));

    create_dir(&config.output_dir)?;
    if let (Some(profile), true) = (&variance, config.plots.enabled) {
        let image = plot::variance_curve(&profile.ratios)?;
        plot::save_png(&image, &config.output_dir.join("explained_variance.png"))?;
    }

    let roster = ml::roster(&config.selection.roster);
    let options = config.selection.options();
    let mut runs = Vec::with_capacity(Target::ALL.len() * representations.len());
    for target in Target::ALL {
        let labels = target.labels(ratings.view());
        for (representation, features) in &representations {
            let representation = *representation;
            let dataset: Dataset = features.clone().with_column(label, labels.clone())?;
            info!(%target, %representation, columns = dataset.n_columns(), "Running model sweep");
            let result = select::select_best(&dataset, label, &roster, &options).map_err(
                |source| ExperimentError::Selection {
                    target,
                    representation,
                    source,
                },
            )?;
            let run_dir = config
                .output_dir
                .join(format!("{}-{}", target.as_str(), representation.as_str()));
            write_artifacts(&run_dir, &result, config.plots.enabled)?;
            runs.push(RunSummary {
                target,
                representation,
                output_dir: run_dir,
                result,
            });
        }
    }

    Ok(ExperimentOutcome {
        brands,
        n_reviews: reviews.len(),
        n_terms,
        n_terms_kept,
        variance,
        runs,
    })
}

/// Drop a term that would collide with the label column.
fn without_term(matrix: TermMatrix, label: &str) -> TermMatrix {
    match matrix.terms.iter().position(|term| term == label) {
        Some(idx) => {
            warn!(term = label, "Dropping term that shares the label column name");
            let keep: Vec<usize> = (0..matrix.n_terms()).filter(|&i| i != idx).collect();
            matrix.select_terms(&keep)
        }
        None => matrix,
    }
}

fn write_artifacts(
    dir: &Path,
    result: &SelectionResult,
    plots: bool,
) -> Result<(), ExperimentError> {
    create_dir(dir)?;
    let report_path = dir.join("report.json");
    SelectionReport::from(result)
        .write_json(&report_path)
        .map_err(|source| ExperimentError::WriteReport {
            path: report_path.clone(),
            source,
        })?;
    if !plots {
        return Ok(());
    }
    if let Some(binary) = &result.binary {
        let image = plot::confusion_heatmap(&binary.confusion)?;
        plot::save_png(&image, &dir.join("confusion_matrix.png"))?;
    }
    if let Some(dist) = &result.distribution {
        let image = plot::distribution_chart(dist)?;
        plot::save_png(&image, &dir.join("distribution.png"))?;
    }
    Ok(())
}

fn create_dir(path: &Path) -> Result<(), ExperimentError> {
    std::fs::create_dir_all(path).map_err(|source| ExperimentError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn label_named_term_is_dropped() {
        let matrix = TermMatrix {
            terms: vec!["good".into(), "rating".into()],
            values: array![[0.6, 0.8]],
        };
        let cleaned = without_term(matrix, "rating");
        assert_eq!(cleaned.terms, vec!["good"]);
        assert_eq!(cleaned.values, array![[0.6]]);
    }

    #[test]
    fn run_directories_are_named_by_target_and_representation() {
        assert_eq!(
            format!("{}-{}", Target::Positive, Representation::Components),
            "positive-components"
        );
    }
}
