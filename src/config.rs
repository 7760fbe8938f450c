//! Experiment configuration stored as TOML.
//!
//! Settings live in `starsift.toml` inside the `.starsift` app directory
//! unless an explicit path is supplied. Every key has a default so partial
//! files are accepted.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs::{self, AppDirError};
use crate::ml::ModelKind;
use crate::select::SelectionOptions;

/// File name of the settings file inside the app directory.
pub const CONFIG_FILE_NAME: &str = "starsift.toml";

/// Errors that may occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to resolve the app directory.
    #[error("No usable config directory: {0}")]
    AppDir(#[from] AppDirError),
    /// Failed to create the directory holding the config file.
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to read a config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write a config file.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to serialize config to TOML.
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    /// A value is outside its accepted range.
    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Top-level experiment settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Review CSV to load.
    pub input: PathBuf,
    /// Directory receiving reports and plots.
    pub output_dir: PathBuf,
    /// Column names in the review CSV.
    pub columns: ColumnSettings,
    pub selection: SelectionSettings,
    pub vocabulary: VocabularySettings,
    pub reduction: ReductionSettings,
    pub plots: PlotSettings,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("reviews.csv"),
            output_dir: PathBuf::from("starsift_out"),
            columns: ColumnSettings::default(),
            selection: SelectionSettings::default(),
            vocabulary: VocabularySettings::default(),
            reduction: ReductionSettings::default(),
            plots: PlotSettings::default(),
        }
    }
}

/// Names of the CSV columns the loader reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSettings {
    pub brand: String,
    pub review: String,
    /// Also used as the label column name in every dataset.
    pub rating: String,
}

impl Default for ColumnSettings {
    fn default() -> Self {
        Self {
            brand: "Company".to_string(),
            review: "Review".to_string(),
            rating: "Rating".to_string(),
        }
    }
}

/// Model selection sweep settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    /// Fraction of rows held out for evaluation.
    pub test_fraction: f64,
    /// Seed for the train/test permutation.
    pub seed: u64,
    /// Fit roster entries on the rayon pool.
    pub parallel: bool,
    /// Classifiers to try, in tie-break order.
    pub roster: Vec<ModelKind>,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            test_fraction: 0.25,
            seed: 0,
            parallel: false,
            roster: ModelKind::ALL.to_vec(),
        }
    }
}

/// Vocabulary pruning settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularySettings {
    /// Drop terms containing numeric characters.
    pub drop_numeric: bool,
    /// Word lists consulted by the dictionary check. Entries whose file is
    /// missing are skipped; if none load, the check is disabled.
    pub dictionaries: Vec<DictionaryEntry>,
}

impl Default for VocabularySettings {
    fn default() -> Self {
        let hunspell = |language: &str, file: &str| DictionaryEntry {
            language: language.to_string(),
            path: PathBuf::from("/usr/share/hunspell").join(file),
        };
        Self {
            drop_numeric: true,
            dictionaries: vec![
                hunspell("en", "en_US.dic"),
                hunspell("es", "es_ES.dic"),
                hunspell("fr", "fr_FR.dic"),
                hunspell("de", "de_DE.dic"),
                hunspell("it", "it_IT.dic"),
            ],
        }
    }
}

/// One language word list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub language: String,
    pub path: PathBuf,
}

/// Dimensionality reduction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionSettings {
    pub enabled: bool,
    /// Cumulative explained-variance ratio the kept components must reach.
    pub variance_target: f64,
    /// Upper bound on components fitted before choosing how many to keep.
    pub max_components: usize,
}

impl Default for ReductionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            variance_target: 0.85,
            max_components: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub enabled: bool,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl SelectionSettings {
    pub fn options(&self) -> SelectionOptions {
        SelectionOptions {
            test_fraction: self.test_fraction,
            seed: self.seed,
            parallel: self.parallel,
        }
    }
}

impl ExperimentConfig {
    /// Reject settings the pipeline cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fraction = self.selection.test_fraction;
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(ConfigError::Invalid {
                key: "selection.test_fraction",
                reason: format!("{fraction} is not between 0 and 1"),
            });
        }
        if self.selection.roster.is_empty() {
            return Err(ConfigError::Invalid {
                key: "selection.roster",
                reason: "at least one model is required".to_string(),
            });
        }
        let target = self.reduction.variance_target;
        if !(target > 0.0 && target <= 1.0) {
            return Err(ConfigError::Invalid {
                key: "reduction.variance_target",
                reason: format!("{target} is not in (0, 1]"),
            });
        }
        if self.reduction.max_components == 0 {
            return Err(ConfigError::Invalid {
                key: "reduction.max_components",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Resolve the default config file path, ensuring the app directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the config at `path`, or the default location when `None`.
///
/// A missing file yields defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<ExperimentConfig, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => config_path()?,
    };
    load_from(&path)
}

/// Load settings from a specific TOML file, returning defaults if it is absent.
pub fn load_from(path: &Path) -> Result<ExperimentConfig, ConfigError> {
    if !path.exists() {
        return Ok(ExperimentConfig::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ExperimentConfig =
        toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

/// Write settings to `path`, creating parent directories as needed.
pub fn save_to_path(config: &ExperimentConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(config).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}
