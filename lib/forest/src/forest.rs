//! Random forest classifier
//!
//! Bagged ensemble of [`DecisionTree`]s. Class probabilities are the mean
//! of the per-tree leaf distributions.

use crate::tree::{argmax, DecisionTree, TreeParams};
use crate::ForestError;
use ahash::AHashMap;
use diagnox_core::{Classifier, Disease, FeatureVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of features examined per split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaxFeatures {
    /// `sqrt(n_features)`
    Sqrt,
    /// `log2(n_features)`
    Log2,
    /// Every feature
    All,
    Fixed(usize),
}

impl MaxFeatures {
    pub fn resolve(&self, n_features: usize) -> usize {
        let n = match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt() as usize,
            MaxFeatures::Log2 => (n_features as f64).log2() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Fixed(k) => *k,
        };
        n.clamp(1, n_features.max(1))
    }
}

/// Forest hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub seed: u64,
    pub max_features: MaxFeatures,
    /// Draw a bootstrap sample per tree instead of using every row
    pub bootstrap: bool,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            seed: 42,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

/// A fitted random forest over disease labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    /// Distinct training labels, sorted ascending
    classes: Vec<Disease>,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit a forest on labeled feature vectors
    ///
    /// Trees are grown in parallel. Every tree gets its own seed drawn from
    /// `config.seed` up front, so the result does not depend on thread
    /// scheduling.
    pub fn fit(
        config: &ForestConfig,
        x: &[FeatureVector],
        y: &[Disease],
    ) -> Result<Self, ForestError> {
        if x.is_empty() {
            return Err(ForestError::EmptyTrainingSet);
        }
        if x.len() != y.len() {
            return Err(ForestError::LengthMismatch {
                features: x.len(),
                labels: y.len(),
            });
        }
        if config.n_trees == 0 {
            return Err(ForestError::InvalidConfig("n_trees must be at least 1".to_string()));
        }

        let mut classes: Vec<Disease> = y.to_vec();
        classes.sort_unstable();
        classes.dedup();

        let class_index: AHashMap<&str, usize> = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();
        let labels: Vec<usize> = y.iter().map(|c| class_index[c.as_str()]).collect();

        let n_features = x[0].dim();
        let params = TreeParams {
            max_features: Some(config.max_features.resolve(n_features)),
            min_samples_split: config.min_samples_split,
            max_depth: config.max_depth,
        };

        let mut master = StdRng::seed_from_u64(config.seed);
        let tree_seeds: Vec<u64> = (0..config.n_trees).map(|_| master.random()).collect();
        let n_samples = x.len();
        let n_classes = classes.len();

        let trees = tree_seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let samples: Vec<usize> = if config.bootstrap {
                    (0..n_samples).map(|_| rng.random_range(0..n_samples)).collect()
                } else {
                    (0..n_samples).collect()
                };
                DecisionTree::fit(x, &labels, &samples, n_classes, &params, &mut rng)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Fitted {} trees over {} samples, {} features, {} classes",
            trees.len(),
            n_samples,
            n_features,
            n_classes
        );

        Ok(Self {
            classes,
            n_features,
            trees,
        })
    }

    #[inline]
    pub fn classes(&self) -> &[Disease] {
        &self.classes
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    #[inline]
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Mean class distribution across all trees, aligned with `classes()`
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f32>, ForestError> {
        let mut sum = vec![0.0f32; self.classes.len()];
        for tree in &self.trees {
            for (acc, p) in sum.iter_mut().zip(tree.predict_proba(features)?) {
                *acc += *p;
            }
        }

        let n = self.trees.len() as f32;
        sum.iter_mut().for_each(|p| *p /= n);
        Ok(sum)
    }

    /// Most probable label (first in class order on ties)
    pub fn predict(&self, features: &FeatureVector) -> Result<&Disease, ForestError> {
        let proba = self.predict_proba(features)?;
        Ok(&self.classes[argmax(&proba)])
    }

    /// Predict a batch of samples in parallel
    pub fn predict_batch(&self, x: &[FeatureVector]) -> Result<Vec<Disease>, ForestError> {
        x.par_iter()
            .map(|row| self.predict(row).map(Disease::clone))
            .collect()
    }
}

impl Classifier for RandomForest {
    fn classes(&self) -> &[Disease] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, features: &FeatureVector) -> diagnox_core::Result<Vec<f32>> {
        Ok(RandomForest::predict_proba(self, features)?)
    }
}
