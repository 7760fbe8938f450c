//! Review CSV input.

mod summary;

use std::path::{Path, PathBuf};

use ndarray::Array1;
use thiserror::Error;

use crate::config::ColumnSettings;

pub use summary::{BrandSummary, brand_summary};

#[derive(Debug, Error)]
pub enum ReviewLoadError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Missing column {column} in {path}")]
    MissingColumn { path: PathBuf, column: String },
    #[error("Line {line}: rating {value:?} is not an integer")]
    InvalidRating { line: u64, value: String },
    #[error("No reviews in {0}")]
    Empty(PathBuf),
}

/// One row of the review table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub brand: String,
    pub text: String,
    pub rating: i64,
}

/// Read every review from `path`, locating columns by header name.
pub fn load_reviews(path: &Path, columns: &ColumnSettings) -> Result<Vec<Review>, ReviewLoadError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| ReviewLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let headers = reader
        .headers()
        .map_err(|source| ReviewLoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    let locate = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| ReviewLoadError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };
    let brand_idx = locate(&columns.brand)?;
    let review_idx = locate(&columns.review)?;
    let rating_idx = locate(&columns.rating)?;

    let mut reviews = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| ReviewLoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let line = record.position().map_or(0, |pos| pos.line());
        let raw_rating = record.get(rating_idx).unwrap_or("").trim();
        let rating = raw_rating
            .parse::<i64>()
            .map_err(|_| ReviewLoadError::InvalidRating {
                line,
                value: raw_rating.to_string(),
            })?;
        reviews.push(Review {
            brand: record.get(brand_idx).unwrap_or("").trim().to_string(),
            text: record.get(review_idx).unwrap_or("").to_string(),
            rating,
        });
    }
    if reviews.is_empty() {
        return Err(ReviewLoadError::Empty(path.to_path_buf()));
    }
    Ok(reviews)
}

/// Ratings as the `f64` label vector.
pub fn ratings(reviews: &[Review]) -> Array1<f64> {
    reviews.iter().map(|review| review.rating as f64).collect()
}
