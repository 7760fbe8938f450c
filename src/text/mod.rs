//! Review text to numeric features.

pub mod tfidf;
pub mod vocab;

use ndarray::{Array2, Axis};

use crate::dataset::{Dataset, DatasetError};

pub use tfidf::{TfidfVectorizer, tokenize};
pub use vocab::{
    Dictionary, DictionaryError, DictionarySet, VocabularyFilter, WordList, has_numeric,
};

/// Term names paired with a `[n_docs, n_terms]` weight matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct TermMatrix {
    pub terms: Vec<String>,
    pub values: Array2<f64>,
}

impl TermMatrix {
    pub fn n_docs(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Keep only the columns at `keep`, in the given order.
    pub fn select_terms(&self, keep: &[usize]) -> Self {
        Self {
            terms: keep.iter().map(|&i| self.terms[i].clone()).collect(),
            values: self.values.select(Axis(1), keep),
        }
    }

    pub fn into_dataset(self) -> Result<Dataset, DatasetError> {
        Dataset::new(self.terms, self.values)
    }
}
