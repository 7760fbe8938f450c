//! Star-rating model selection over Amazon laptop reviews.
//!
//! The library exposes each stage of the pipeline so the CLI, tests, and
//! benchmarks can drive them separately.

/// Application directory resolution.
pub mod app_dirs;
/// TOML experiment settings.
pub mod config;
/// Named numeric tables, splits, and targets.
pub mod dataset;
/// The full review experiment.
pub mod experiment;
/// Tracing subscriber setup.
pub mod logging;
/// Classifiers and metrics.
pub mod ml;
/// PNG charts.
pub mod plot;
/// PCA reduction.
pub mod reduction;
/// Review CSV loading and brand summaries.
pub mod reviews;
/// Lowest-RMSE model selection.
pub mod select;
/// TF-IDF and vocabulary filtering.
pub mod text;
