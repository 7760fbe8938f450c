//! TF-IDF weighting with smoothed idf and L2-normalized rows.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use ndarray::{Array1, Array2};
use regex::Regex;

use super::TermMatrix;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?u)\b\w\w+\b").expect("token regex must compile"));

/// Lowercased runs of two or more word characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Vocabulary and idf weights learned from a corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct TfidfVectorizer {
    /// Sorted vocabulary; position is the column index.
    vocabulary: Vec<String>,
    idf: Array1<f64>,
}

impl TfidfVectorizer {
    pub fn fit<S: AsRef<str>>(docs: &[S]) -> Self {
        let mut df: BTreeMap<String, usize> = BTreeMap::new();
        for doc in docs {
            let unique: BTreeSet<String> = tokenize(doc.as_ref()).into_iter().collect();
            for term in unique {
                *df.entry(term).or_default() += 1;
            }
        }
        let n = docs.len() as f64;
        let idf = df
            .values()
            .map(|&count| ((1.0 + n) / (1.0 + count as f64)).ln() + 1.0)
            .collect();
        Self {
            vocabulary: df.into_keys().collect(),
            idf,
        }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn idf(&self) -> &Array1<f64> {
        &self.idf
    }

    /// Weight `docs` against the fitted vocabulary; unseen terms are ignored.
    pub fn transform<S: AsRef<str>>(&self, docs: &[S]) -> TermMatrix {
        let mut values = Array2::<f64>::zeros((docs.len(), self.vocabulary.len()));
        for (row_idx, doc) in docs.iter().enumerate() {
            let mut row = values.row_mut(row_idx);
            for token in tokenize(doc.as_ref()) {
                if let Ok(col) = self.vocabulary.binary_search(&token) {
                    row[col] += 1.0;
                }
            }
            row *= &self.idf;
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row /= norm;
            }
        }
        TermMatrix {
            terms: self.vocabulary.clone(),
            values,
        }
    }

    pub fn fit_transform<S: AsRef<str>>(docs: &[S]) -> (Self, TermMatrix) {
        let vectorizer = Self::fit(docs);
        let matrix = vectorizer.transform(docs);
        (vectorizer, matrix)
    }
}
