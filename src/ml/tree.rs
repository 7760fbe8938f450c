//! CART decision tree with Gini impurity.
//!
//! Nodes live in a flat arena and are grown with an explicit work stack, so
//! unbounded depth does not recurse.

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{
    Classifier, DEFAULT_MODEL_SEED, FittedModel, LabelEncoder, ModelError, argmax,
    validate_training,
};

#[derive(Debug, Clone)]
pub struct DecisionTree {
    /// `None` grows until leaves are pure or too small to split.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// Features examined per split; `None` examines all.
    pub max_features: Option<usize>,
    pub seed: u64,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
            seed: DEFAULT_MODEL_SEED,
        }
    }
}

impl Classifier for DecisionTree {
    fn name(&self) -> &str {
        "decision_tree"
    }

    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Box<dyn FittedModel>, ModelError> {
        let encoder = validate_training(x, y)?;
        let encoded = encoder.encode_all(y);
        let grower = TreeGrower {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            max_features: self.max_features,
        };
        let mut rng = StdRng::seed_from_u64(self.seed);
        let rows: Vec<usize> = (0..x.nrows()).collect();
        let tree = grower.grow(x, &encoded, encoder.n_classes(), rows, &mut rng);
        Ok(Box::new(TreeModel { encoder, tree }))
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Node {
    Leaf {
        /// Class proportions of the training rows that reached the leaf.
        distribution: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A grown tree; node 0 is the root.
#[derive(Debug, Clone)]
pub(crate) struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub(crate) fn distribution(&self, row: ArrayView1<'_, f64>) -> &[f64] {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub(crate) fn depth(&self) -> usize {
        let mut max_depth = 0usize;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Node::Split { left, right, .. } = &self.nodes[idx] {
                stack.push((*left, depth + 1));
                stack.push((*right, depth + 1));
            }
        }
        max_depth
    }
}

#[derive(Debug, Clone)]
pub struct TreeModel {
    encoder: LabelEncoder,
    tree: Tree,
}

impl TreeModel {
    pub fn depth(&self) -> usize {
        self.tree.depth()
    }
}

impl FittedModel for TreeModel {
    fn name(&self) -> &str {
        "decision_tree"
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        x.axis_iter(Axis(0))
            .map(|row| self.encoder.decode(argmax(self.tree.distribution(row))))
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeGrower {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub max_features: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    /// Sum over both sides of `Σ count² / side_size`; larger is purer.
    purity: f64,
}

impl TreeGrower {
    pub(crate) fn grow(
        &self,
        x: ArrayView2<'_, f64>,
        y: &[usize],
        n_classes: usize,
        rows: Vec<usize>,
        rng: &mut StdRng,
    ) -> Tree {
        let mut nodes = vec![Node::Leaf {
            distribution: Vec::new(),
        }];
        let mut stack = vec![(0usize, rows, 0usize)];
        while let Some((slot, rows, depth)) = stack.pop() {
            let counts = class_counts(y, &rows, n_classes);
            let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
            let depth_reached = self.max_depth.is_some_and(|max| depth >= max);
            let too_small = rows.len() < self.min_samples_split.max(2);
            let split = if pure || depth_reached || too_small {
                None
            } else {
                self.best_split(x, y, n_classes, &rows, rng)
            };
            let Some(split) = split else {
                nodes[slot] = leaf(&counts, rows.len());
                continue;
            };
            let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
                .iter()
                .partition(|&&r| x[[r, split.feature]] <= split.threshold);
            if left_rows.is_empty() || right_rows.is_empty() {
                nodes[slot] = leaf(&counts, rows.len());
                continue;
            }
            let left = nodes.len();
            let right = left + 1;
            nodes.push(Node::Leaf {
                distribution: Vec::new(),
            });
            nodes.push(Node::Leaf {
                distribution: Vec::new(),
            });
            nodes[slot] = Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
            };
            stack.push((right, right_rows, depth + 1));
            stack.push((left, left_rows, depth + 1));
        }
        Tree { nodes }
    }

    fn candidate_features(&self, n_features: usize, rng: &mut StdRng) -> Vec<usize> {
        match self.max_features {
            Some(m) if m < n_features => {
                let mut picked = rand::seq::index::sample(rng, n_features, m.max(1)).into_vec();
                picked.sort_unstable();
                picked
            }
            _ => (0..n_features).collect(),
        }
    }

    fn best_split(
        &self,
        x: ArrayView2<'_, f64>,
        y: &[usize],
        n_classes: usize,
        rows: &[usize],
        rng: &mut StdRng,
    ) -> Option<SplitCandidate> {
        let total = class_counts(y, rows, n_classes);
        let mut best: Option<SplitCandidate> = None;
        let mut pairs: Vec<(f64, usize)> = Vec::with_capacity(rows.len());
        for feature in self.candidate_features(x.ncols(), rng) {
            pairs.clear();
            pairs.extend(rows.iter().map(|&r| (x[[r, feature]], y[r])));
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
            if pairs[0].0 == pairs[pairs.len() - 1].0 {
                continue;
            }
            let mut left = vec![0usize; n_classes];
            for i in 0..pairs.len() - 1 {
                left[pairs[i].1] += 1;
                if pairs[i].0 == pairs[i + 1].0 {
                    continue;
                }
                let n_left = (i + 1) as f64;
                let n_right = (pairs.len() - i - 1) as f64;
                let mut left_sq = 0.0;
                let mut right_sq = 0.0;
                for c in 0..n_classes {
                    let l = left[c] as f64;
                    let r = (total[c] - left[c]) as f64;
                    left_sq += l * l;
                    right_sq += r * r;
                }
                let purity = left_sq / n_left + right_sq / n_right;
                if best.is_none_or(|b| purity > b.purity) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: midpoint(pairs[i].0, pairs[i + 1].0),
                        purity,
                    });
                }
            }
        }
        best
    }
}

/// Halfway between two sorted values, never rounding up onto `hi`.
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo / 2.0 + hi / 2.0;
    if mid >= hi || mid < lo { lo } else { mid }
}

fn class_counts(y: &[usize], rows: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &r in rows {
        counts[y[r]] += 1;
    }
    counts
}

fn leaf(counts: &[usize], n: usize) -> Node {
    let n = n.max(1) as f64;
    Node::Leaf {
        distribution: counts.iter().map(|&c| c as f64 / n).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn memorizes_training_data() {
        let x = array![
            [0.0, 1.0],
            [1.0, 1.0],
            [2.0, 0.0],
            [3.0, 0.0],
            [4.0, 1.0],
            [5.0, 0.0]
        ];
        let y = array![1.0, 1.0, 3.0, 3.0, 5.0, 5.0];
        let model = DecisionTree::default().fit(x.view(), y.view()).unwrap();
        assert_eq!(model.predict(x.view()), y);
    }

    #[test]
    fn midpoint_threshold_splits_new_points() {
        let x = array![[0.0], [1.0], [3.0], [4.0]];
        let y = array![0.0, 0.0, 1.0, 1.0];
        let model = DecisionTree::default().fit(x.view(), y.view()).unwrap();
        let probe = array![[1.9], [2.1]];
        assert_eq!(model.predict(probe.view()), array![0.0, 1.0]);
    }

    #[test]
    fn max_depth_limits_growth() {
        let x = array![[0.0], [1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = [0usize, 1, 0, 1, 0, 1];
        let grower = TreeGrower {
            max_depth: Some(1),
            min_samples_split: 2,
            max_features: None,
        };
        let mut rng = StdRng::seed_from_u64(0);
        let tree = grower.grow(x.view(), &y, 2, (0..6).collect(), &mut rng);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn identical_rows_become_a_leaf() {
        let x = array![[1.0], [1.0], [1.0]];
        let y = [0usize, 1, 1];
        let grower = TreeGrower {
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
        };
        let mut rng = StdRng::seed_from_u64(0);
        let tree = grower.grow(x.view(), &y, 2, (0..3).collect(), &mut rng);
        assert_eq!(tree.depth(), 0);
        let dist = tree.distribution(x.row(0));
        assert!((dist[1] - 2.0 / 3.0).abs() < 1e-12);
    }

    fn unbounded() -> TreeGrower {
        TreeGrower {
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
        }
    }

    #[test]
    fn midpoint_stays_below_upper_value() {
        let a = f64::from_bits(1.0f64.to_bits() + 1);
        let b = f64::from_bits(1.0f64.to_bits() + 2);
        let mid = midpoint(a, b);
        assert!(mid >= a && mid < b);
        assert_eq!(midpoint(0.0, 1.0), 0.5);
        assert_eq!(midpoint(-3.0, -1.0), -2.0);
    }

    #[test]
    fn splits_values_one_ulp_apart() {
        let a = f64::from_bits(1.0f64.to_bits() + 1);
        let b = f64::from_bits(1.0f64.to_bits() + 2);
        let x = array![[a], [b]];
        let y = [0usize, 1];
        let mut rng = StdRng::seed_from_u64(0);
        let tree = unbounded().grow(x.view(), &y, 2, vec![0, 1], &mut rng);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.distribution(x.row(0)), &[1.0, 0.0]);
        assert_eq!(tree.distribution(x.row(1)), &[0.0, 1.0]);

        let model = DecisionTree::default()
            .fit(x.view(), array![3.0, 4.0].view())
            .unwrap();
        assert_eq!(model.predict(x.view()), array![3.0, 4.0]);
    }

    #[test]
    fn conflicting_duplicates_stop_growing() {
        let x = array![[0.0, 2.0], [0.0, 2.0], [0.0, 2.0], [1.0, 5.0], [1.0, 5.0]];
        let y = [0usize, 1, 1, 0, 1];
        let mut rng = StdRng::seed_from_u64(3);
        let tree = unbounded().grow(x.view(), &y, 2, vec![0, 1, 2, 2, 3, 4, 4], &mut rng);
        assert!(tree.depth() <= 1);
        let dist = tree.distribution(x.row(0));
        assert!((dist.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_feature_subset_yields_leaf() {
        let x = array![[7.0, 7.0, 0.0], [7.0, 7.0, 1.0], [7.0, 7.0, 2.0], [7.0, 7.0, 3.0]];
        let y = [0usize, 0, 1, 1];
        let grower = TreeGrower {
            max_depth: None,
            min_samples_split: 2,
            max_features: Some(1),
        };
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let tree = grower.grow(x.view(), &y, 2, (0..4).collect(), &mut rng);
            assert!(tree.depth() <= 2);
            for row in x.rows() {
                assert_eq!(tree.distribution(row).len(), 2);
            }
        }
        let model = DecisionTree {
            max_features: Some(1),
            ..Default::default()
        }
        .fit(x.view(), array![1.0, 1.0, 2.0, 2.0].view())
        .unwrap();
        assert_eq!(model.predict(x.view()).len(), 4);
    }
}
