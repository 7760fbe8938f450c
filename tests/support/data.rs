use std::fmt::Write as _;
use std::path::Path;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use starsift::dataset::Dataset;

/// `rows` x (`features` + label) table. The label cycles through 1..=5 and
/// `Feature_0` tracks it with a little noise; other features are noise.
pub fn rating_table(rows: usize, features: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut values = Array2::<f64>::zeros((rows, features + 1));
    for r in 0..rows {
        let label = (r % 5 + 1) as f64;
        values[[r, 0]] = label + rng.random_range(-0.2..0.2);
        for c in 1..features {
            values[[r, c]] = rng.random_range(0.0..1.0);
        }
        values[[r, features]] = label;
    }
    let mut columns: Vec<String> = (0..features).map(|c| format!("Feature_{c}")).collect();
    columns.push("Rating".to_string());
    Dataset::new(columns, values).expect("valid synthetic table")
}

/// Same table with the label collapsed to `rating > 2`.
pub fn binary_table(rows: usize, features: usize, seed: u64) -> Dataset {
    rating_table(rows, features, seed)
        .map_column("Rating", |v| if v > 2.0 { 1.0 } else { 0.0 })
        .expect("rating column")
}

const GOOD: &[&str] = &["great", "fast", "bright", "love", "excellent"];
const BAD: &[&str] = &["slow", "broken", "awful", "refund", "noisy"];
const NEUTRAL: &[&str] = &["laptop", "screen", "keyboard", "battery"];

/// Write a review CSV whose wording follows the rating, with a leading index
/// column and a numeric token the vocabulary filter should drop.
pub fn write_reviews_csv(path: &Path, rows: usize) {
    let brands = ["Acme", "Bolt", "Zeta"];
    let mut csv = String::from(",Company,Review,Rating\n");
    for r in 0..rows {
        let rating = r % 5 + 1;
        let words = if rating > 2 { GOOD } else { BAD };
        let text = format!(
            "{} {} {} 16gb {}",
            words[r % words.len()],
            words[(r + 2) % words.len()],
            NEUTRAL[r % NEUTRAL.len()],
            if rating == 1 { "never" } else { "again" },
        );
        let _ = writeln!(csv, "{r},{},\"{text}\",{rating}", brands[r % brands.len()]);
    }
    std::fs::write(path, csv).expect("write reviews csv");
}

/// Plain word list covering every generated word except the numeric token.
pub fn write_word_list(path: &Path) {
    let mut words: Vec<&str> = GOOD.iter().chain(BAD).chain(NEUTRAL).copied().collect();
    words.extend(["never", "again"]);
    std::fs::write(path, words.join("\n")).expect("write word list");
}
