//! Named numeric tables and the helpers the selector needs around them.

pub mod labels;
pub mod split;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2, ArrayView2, Axis, concatenate};
use thiserror::Error;

pub use labels::{Target, binarize_above, binarize_equal};
pub use split::{SplitError, TrainTestSplit, train_test_split};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Line {line}, column {column}: {value:?} is not a number")]
    NotNumeric {
        line: u64,
        column: String,
        value: String,
    },
    #[error("Column count {names} does not match matrix width {width}")]
    ShapeMismatch { names: usize, width: usize },
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),
    #[error("Missing column: {0}")]
    MissingColumn(String),
    #[error("Column {column} has {got} values, expected {expected}")]
    LengthMismatch {
        column: String,
        got: usize,
        expected: usize,
    },
}

/// Ordered, uniquely named `f64` columns over a shared row index.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    values: Array2<f64>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, values: Array2<f64>) -> Result<Self, DatasetError> {
        if columns.len() != values.ncols() {
            return Err(DatasetError::ShapeMismatch {
                names: columns.len(),
                width: values.ncols(),
            });
        }
        let mut seen = HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(DatasetError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self { columns, values })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn column(&self, name: &str) -> Result<Array1<f64>, DatasetError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))?;
        Ok(self.values.column(idx).to_owned())
    }

    /// Split into the feature matrix (every other column, in order) and the
    /// label vector.
    pub fn features_and_label(
        &self,
        label: &str,
    ) -> Result<(Array2<f64>, Array1<f64>), DatasetError> {
        let label_idx = self
            .column_index(label)
            .ok_or_else(|| DatasetError::MissingColumn(label.to_string()))?;
        let feature_idx: Vec<usize> = (0..self.n_columns()).filter(|&i| i != label_idx).collect();
        let x = self.values.select(Axis(1), &feature_idx);
        let y = self.values.column(label_idx).to_owned();
        Ok((x, y))
    }

    /// Append `values` as a new column, or replace it if `name` exists.
    pub fn with_column(mut self, name: &str, values: Array1<f64>) -> Result<Self, DatasetError> {
        if values.len() != self.n_rows() {
            return Err(DatasetError::LengthMismatch {
                column: name.to_string(),
                got: values.len(),
                expected: self.n_rows(),
            });
        }
        if let Some(idx) = self.column_index(name) {
            self.values.column_mut(idx).assign(&values);
            return Ok(self);
        }
        let column = values.insert_axis(Axis(1));
        let values = concatenate(Axis(1), &[self.values.view(), column.view()])
            .map_err(|_| DatasetError::ShapeMismatch {
                names: self.columns.len() + 1,
                width: self.values.ncols() + 1,
            })?;
        self.columns.push(name.to_string());
        Ok(Self {
            columns: self.columns,
            values,
        })
    }

    /// Read a CSV whose every column is numeric. The header row names the
    /// columns; a blank leading header (a saved row index) is skipped.
    pub fn read_csv(path: &Path) -> Result<Self, DatasetError> {
        let csv_error = |source| DatasetError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
        let headers = reader.headers().map_err(csv_error)?.clone();
        let skip_index = headers.get(0).is_some_and(|h| h.trim().is_empty());
        let first = usize::from(skip_index);
        let columns: Vec<String> = headers.iter().skip(first).map(|h| h.trim().to_string()).collect();

        let mut flat = Vec::new();
        let mut rows = 0usize;
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            let line = record.position().map_or(0, |pos| pos.line());
            for (column, raw) in columns.iter().zip(record.iter().skip(first)) {
                let value = raw.trim().parse::<f64>().map_err(|_| DatasetError::NotNumeric {
                    line,
                    column: column.clone(),
                    value: raw.to_string(),
                })?;
                flat.push(value);
            }
            rows += 1;
        }
        let values = Array2::from_shape_vec((rows, columns.len()), flat).map_err(|_| {
            DatasetError::ShapeMismatch {
                names: columns.len(),
                width: 0,
            }
        })?;
        Self::new(columns, values)
    }

    /// Copy of the dataset with `name` rewritten through `f`.
    pub fn map_column(&self, name: &str, f: impl Fn(f64) -> f64) -> Result<Self, DatasetError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))?;
        let mut values = self.values.clone();
        values.column_mut(idx).mapv_inplace(f);
        Ok(Self {
            columns: self.columns.clone(),
            values,
        })
    }
}
