//! Bagged ensemble of Gini trees.

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::tree::{Tree, TreeGrower};
use super::{
    Classifier, DEFAULT_MODEL_SEED, FittedModel, LabelEncoder, ModelError, argmax,
    validate_training,
};

#[derive(Debug, Clone)]
pub struct RandomForest {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// Features tried per split; `None` uses `round(sqrt(n_features))`.
    pub max_features: Option<usize>,
    pub seed: u64,
}

impl Default for RandomForest {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
            seed: DEFAULT_MODEL_SEED,
        }
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &str {
        "random_forest"
    }

    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Box<dyn FittedModel>, ModelError> {
        let encoder = validate_training(x, y)?;
        let encoded = encoder.encode_all(y);
        let n_classes = encoder.n_classes();
        let n = x.nrows();
        let max_features = self
            .max_features
            .unwrap_or_else(|| ((x.ncols() as f64).sqrt().round() as usize).max(1));
        let grower = TreeGrower {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            max_features: Some(max_features),
        };
        let trees: Vec<Tree> = (0..self.n_trees.max(1))
            .into_par_iter()
            .map(|tree_idx| {
                let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(tree_idx as u64));
                let rows: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
                grower.grow(x, &encoded, n_classes, rows, &mut rng)
            })
            .collect();
        Ok(Box::new(ForestModel { encoder, trees }))
    }
}

#[derive(Debug, Clone)]
pub struct ForestModel {
    encoder: LabelEncoder,
    trees: Vec<Tree>,
}

impl ForestModel {
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean leaf distribution across trees for one row.
    fn vote(&self, row: ArrayView1<'_, f64>) -> Vec<f64> {
        let mut total = vec![0.0; self.encoder.n_classes()];
        for tree in &self.trees {
            for (acc, p) in total.iter_mut().zip(tree.distribution(row)) {
                *acc += p;
            }
        }
        let n = self.trees.len().max(1) as f64;
        total.iter_mut().for_each(|v| *v /= n);
        total
    }
}

impl FittedModel for ForestModel {
    fn name(&self) -> &str {
        "random_forest"
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        x.axis_iter(Axis(0))
            .map(|row| self.encoder.decode(argmax(&self.vote(row))))
            .collect()
    }
}
