mod support;

use starsift::ml::{self, Classifier, ModelKind};
use starsift::select::{SelectionOptions, select_best};
use support::data::{binary_table, rating_table};
use support::stub::{Constant, MeanStub};

#[test]
fn hundred_rows_split_three_to_one() {
    let dataset = rating_table(100, 5, 1);
    let roster = ml::roster(&[ModelKind::GaussianNb]);
    let result = select_best(&dataset, "Rating", &roster, &SelectionOptions::default())
        .expect("selection");
    assert_eq!(result.n_train, 75);
    assert_eq!(result.n_test, 25);
    assert_eq!(result.predictions.len(), 25);
    assert_eq!(result.actual.len(), 25);
}

#[test]
fn default_roster_is_deterministic() {
    let dataset = rating_table(100, 5, 2);
    let options = SelectionOptions::default();
    let first = select_best(&dataset, "Rating", &ml::default_roster(), &options).expect("first");
    let second = select_best(&dataset, "Rating", &ml::default_roster(), &options).expect("second");
    assert_eq!(first.best_name, second.best_name);
    assert_eq!(first.best_index, second.best_index);
    assert_eq!(first.predictions, second.predictions);
    assert_eq!(first.candidates, second.candidates);
    assert_eq!(first.candidates.len(), ModelKind::ALL.len());
}

#[test]
fn parallel_sweep_matches_sequential() {
    let dataset = rating_table(80, 4, 3);
    let sequential = SelectionOptions::default();
    let parallel = SelectionOptions {
        parallel: true,
        ..sequential
    };
    let a = select_best(&dataset, "Rating", &ml::default_roster(), &sequential).expect("seq");
    let b = select_best(&dataset, "Rating", &ml::default_roster(), &parallel).expect("par");
    assert_eq!(a.best_index, b.best_index);
    assert_eq!(a.candidates, b.candidates);
    assert_eq!(a.predictions, b.predictions);
}

#[test]
fn best_rmse_is_no_worse_than_any_candidate() {
    let dataset = rating_table(100, 5, 4);
    let result = select_best(
        &dataset,
        "Rating",
        &ml::default_roster(),
        &SelectionOptions::default(),
    )
    .expect("selection");
    for candidate in &result.candidates {
        assert!(result.metrics.rmse <= candidate.rmse, "{candidate:?}");
    }
    assert_eq!(result.candidates[result.best_index].name, result.best_name);
}

#[test]
fn model_beating_the_mean_stub_wins() {
    let dataset = rating_table(100, 5, 5);
    let roster: Vec<Box<dyn Classifier>> = vec![
        Box::new(MeanStub),
        ModelKind::DecisionTree.build(ml::DEFAULT_MODEL_SEED),
    ];
    let result =
        select_best(&dataset, "Rating", &roster, &SelectionOptions::default()).expect("selection");
    assert_eq!(result.best_name, "decision_tree");
    assert!(result.candidates[1].rmse < result.candidates[0].rmse);
}

#[test]
fn mean_stub_wins_when_nothing_beats_it() {
    let dataset = rating_table(100, 5, 6);
    let roster: Vec<Box<dyn Classifier>> = vec![Box::new(Constant(100.0)), Box::new(MeanStub)];
    let result =
        select_best(&dataset, "Rating", &roster, &SelectionOptions::default()).expect("selection");
    assert_eq!(result.best_name, "mean_stub");
    assert_eq!(result.best_index, 1);
}

#[test]
fn binary_labels_report_confusion_counts() {
    let dataset = binary_table(100, 5, 7);
    let roster = ml::roster(&[ModelKind::GaussianNb, ModelKind::LogisticRegression]);
    let result =
        select_best(&dataset, "Rating", &roster, &SelectionOptions::default()).expect("selection");
    assert!(result.distribution.is_none());
    let binary = result.binary.expect("binary report");
    assert_eq!(binary.positive_label, 1.0);
    let cm = &binary.confusion;
    let (tn, tp) = (cm.get(0, 0) as f64, cm.get(1, 1) as f64);
    assert_eq!(binary.accuracy, (tp + tn) / cm.total() as f64);
    assert_eq!(cm.total(), result.n_test as u64);
}

#[test]
fn five_star_labels_compare_distributions() {
    let dataset = rating_table(100, 5, 8);
    let roster = ml::roster(&[ModelKind::DecisionTree]);
    let result =
        select_best(&dataset, "Rating", &roster, &SelectionOptions::default()).expect("selection");
    assert!(result.binary.is_none());
    let dist = result.distribution.expect("distribution");
    assert_eq!(dist.actual_counts.iter().sum::<usize>(), 25);
    assert_eq!(dist.predicted_counts.iter().sum::<usize>(), 25);
}
