//! Vocabulary pruning: numeric tokens and words no dictionary knows.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use super::TermMatrix;
use crate::config::{DictionaryEntry, VocabularySettings};

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("Failed to read word list {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Spell-check lookup for one language.
pub trait Dictionary: Send + Sync + fmt::Debug {
    fn language(&self) -> &str;

    /// Case-insensitive membership test.
    fn contains(&self, word: &str) -> bool;
}

/// In-memory word set loaded from a plain list or a Hunspell `.dic` file.
#[derive(Debug, Clone, PartialEq)]
pub struct WordList {
    language: String,
    words: HashSet<String>,
}

impl WordList {
    pub fn from_words<I, S>(language: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            language: language.to_string(),
            words: words
                .into_iter()
                .map(|word| word.as_ref().to_lowercase())
                .filter(|word| !word.is_empty())
                .collect(),
        }
    }

    pub fn load(language: &str, path: &Path) -> Result<Self, DictionaryError> {
        let text = std::fs::read_to_string(path).map_err(|source| DictionaryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(language, &text))
    }

    /// One entry per line. A leading all-digit line (the Hunspell entry
    /// count) is skipped and `/FLAGS` suffixes are stripped.
    pub fn parse(language: &str, text: &str) -> Self {
        let mut lines = text.lines().peekable();
        if lines
            .peek()
            .is_some_and(|first| !first.trim().is_empty() && first.trim().bytes().all(|b| b.is_ascii_digit()))
        {
            lines.next();
        }
        let words = lines.filter_map(|line| {
            let entry = line.split('/').next().unwrap_or("");
            entry.split_whitespace().next()
        });
        Self::from_words(language, words)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Dictionary for WordList {
    fn language(&self) -> &str {
        &self.language
    }

    fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }
}

/// Accepts a word when any member dictionary does.
#[derive(Debug, Default)]
pub struct DictionarySet {
    dictionaries: Vec<Box<dyn Dictionary>>,
}

impl DictionarySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, dictionary: Box<dyn Dictionary>) {
        self.dictionaries.push(dictionary);
    }

    pub fn is_empty(&self) -> bool {
        self.dictionaries.is_empty()
    }

    pub fn languages(&self) -> Vec<&str> {
        self.dictionaries.iter().map(|d| d.language()).collect()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.dictionaries.iter().any(|d| d.contains(word))
    }

    /// Load every configured word list; missing files are skipped.
    pub fn load(entries: &[DictionaryEntry]) -> Result<Self, DictionaryError> {
        let mut set = Self::new();
        for entry in entries {
            if !entry.path.exists() {
                warn!(
                    language = %entry.language,
                    path = %entry.path.display(),
                    "Word list not found; skipping"
                );
                continue;
            }
            let list = WordList::load(&entry.language, &entry.path)?;
            info!(language = %entry.language, words = list.len(), "Loaded word list");
            set.push(Box::new(list));
        }
        Ok(set)
    }
}

/// True when `term` holds any numeric character.
pub fn has_numeric(term: &str) -> bool {
    term.chars().any(char::is_numeric)
}

/// Decides which term columns survive.
#[derive(Debug)]
pub struct VocabularyFilter {
    pub drop_numeric: bool,
    pub dictionaries: DictionarySet,
}

impl VocabularyFilter {
    pub fn from_settings(settings: &VocabularySettings) -> Result<Self, DictionaryError> {
        Ok(Self {
            drop_numeric: settings.drop_numeric,
            dictionaries: DictionarySet::load(&settings.dictionaries)?,
        })
    }

    pub fn keeps(&self, term: &str) -> bool {
        if self.drop_numeric && has_numeric(term) {
            return false;
        }
        self.dictionaries.is_empty() || self.dictionaries.contains(term)
    }

    /// Indices of the terms to keep, ascending.
    pub fn keep_indices(&self, terms: &[String]) -> Vec<usize> {
        terms
            .iter()
            .enumerate()
            .filter(|(_, term)| self.keeps(term))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Drop rejected columns. Row weights are left as they were.
    pub fn apply(&self, matrix: &TermMatrix) -> TermMatrix {
        if self.dictionaries.is_empty() {
            warn!("No dictionaries loaded; skipping dictionary check");
        }
        let keep = self.keep_indices(&matrix.terms);
        info!(
            before = matrix.n_terms(),
            after = keep.len(),
            languages = ?self.dictionaries.languages(),
            "Filtered vocabulary"
        );
        matrix.select_terms(&keep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use tempfile::tempdir;

    #[test]
    fn parses_hunspell_dic() {
        let list = WordList::parse("en", "3\nLaptop/MS\nscreen/S\nbattery\n");
        assert_eq!(list.len(), 3);
        assert!(list.contains("laptop"));
        assert!(list.contains("Screen"));
        assert!(!list.contains("3"));
    }

    #[test]
    fn any_language_accepts() {
        let mut set = DictionarySet::new();
        set.push(Box::new(WordList::from_words("en", ["good"])));
        set.push(Box::new(WordList::from_words("es", ["bueno"])));
        assert!(set.contains("bueno"));
        assert!(set.contains("good"));
        assert!(!set.contains("gud"));
        assert_eq!(set.languages(), vec!["en", "es"]);
    }

    #[test]
    fn numeric_characters_are_detected() {
        assert!(has_numeric("i7"));
        assert!(has_numeric("2020"));
        assert!(has_numeric("½"));
        assert!(!has_numeric("laptop"));
    }

    #[test]
    fn filter_drops_numbers_and_unknown_words() {
        let mut dictionaries = DictionarySet::new();
        dictionaries.push(Box::new(WordList::from_words("en", ["fast", "screen"])));
        let filter = VocabularyFilter {
            drop_numeric: true,
            dictionaries,
        };
        let matrix = TermMatrix {
            terms: vec!["16gb".into(), "fast".into(), "scren".into(), "screen".into()],
            values: array![[0.5, 0.5, 0.5, 0.5], [0.0, 0.6, 0.0, 0.8]],
        };
        let filtered = filter.apply(&matrix);
        assert_eq!(filtered.terms, vec!["fast", "screen"]);
        assert_eq!(filtered.values, array![[0.5, 0.5], [0.6, 0.8]]);
    }

    #[test]
    fn no_dictionaries_keeps_words() {
        let filter = VocabularyFilter {
            drop_numeric: true,
            dictionaries: DictionarySet::new(),
        };
        assert!(filter.keeps("scren"));
        assert!(!filter.keeps("2nd"));
    }

    #[test]
    fn missing_word_lists_are_skipped() {
        let dir = tempdir().unwrap();
        let present = dir.path().join("en.txt");
        std::fs::write(&present, "hello\nworld\n").unwrap();
        let entries = vec![
            DictionaryEntry {
                language: "en".into(),
                path: present,
            },
            DictionaryEntry {
                language: "fr".into(),
                path: dir.path().join("absent.dic"),
            },
        ];
        let set = DictionarySet::load(&entries).unwrap();
        assert_eq!(set.languages(), vec!["en"]);
    }
}
