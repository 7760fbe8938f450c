mod support;

use starsift::config::{DictionaryEntry, ExperimentConfig};
use starsift::dataset::Target;
use starsift::experiment::{Representation, run_experiment};
use starsift::ml::ModelKind;
use starsift::select::SelectionReport;
use support::data::{write_reviews_csv, write_word_list};

fn small_config(dir: &std::path::Path) -> ExperimentConfig {
    let input = dir.join("reviews.csv");
    write_reviews_csv(&input, 60);
    let words = dir.join("en.txt");
    write_word_list(&words);

    let mut config = ExperimentConfig {
        input,
        output_dir: dir.join("out"),
        ..Default::default()
    };
    config.vocabulary.dictionaries = vec![DictionaryEntry {
        language: "en".to_string(),
        path: words,
    }];
    config.selection.roster = vec![ModelKind::GaussianNb, ModelKind::DecisionTree];
    config.reduction.max_components = 8;
    config
}

#[test]
fn experiment_writes_six_reports() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = small_config(dir.path());
    let outcome = run_experiment(&config).expect("experiment");

    assert_eq!(outcome.n_reviews, 60);
    assert_eq!(outcome.brands.len(), 3);
    assert!(outcome.n_terms_kept < outcome.n_terms);
    assert!(outcome.variance.is_some());
    assert_eq!(outcome.runs.len(), 6);
    assert!(config.output_dir.join("explained_variance.png").exists());

    for run in &outcome.runs {
        let report_path = run.output_dir.join("report.json");
        let data = std::fs::read(&report_path).expect("report written");
        let report: SelectionReport = serde_json::from_slice(&data).expect("report json");
        assert_eq!(report.best_model, run.result.best_name);
        match run.target {
            Target::Exact => {
                assert!(report.distribution.is_some());
                assert!(run.output_dir.join("distribution.png").exists());
            }
            Target::Positive | Target::Negative => {
                assert!(report.binary.is_some());
                assert!(run.output_dir.join("confusion_matrix.png").exists());
            }
        }
    }

    let names: Vec<String> = outcome
        .runs
        .iter()
        .map(|run| format!("{}-{}", run.target, run.representation))
        .collect();
    assert!(names.contains(&"negative-components".to_string()));
    assert!(names.contains(&"exact-terms".to_string()));
}

#[test]
fn reduction_can_be_disabled() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = small_config(dir.path());
    config.reduction.enabled = false;
    config.plots.enabled = false;
    let outcome = run_experiment(&config).expect("experiment");
    assert_eq!(outcome.runs.len(), 3);
    assert!(
        outcome
            .runs
            .iter()
            .all(|run| run.representation == Representation::Terms)
    );
    assert!(!config.output_dir.join("exact-terms/distribution.png").exists());
}
