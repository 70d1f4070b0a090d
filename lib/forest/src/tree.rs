//! CART decision tree
//!
//! Gini-impurity classification tree grown to purity by default. Each node
//! examines features in random order and stops after `max_features`
//! non-constant features have been evaluated, the same way a forest of
//! randomized trees decorrelates its members.

use crate::ForestError;
use diagnox_core::FeatureVector;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tree growth parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// Non-constant features evaluated per split (`None` = all)
    pub max_features: Option<usize>,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
    /// Maximum depth (`None` = grow until pure)
    pub max_depth: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_features: None,
            min_samples_split: 2,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Class probabilities at this leaf
        distribution: Vec<f32>,
    },
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    feature: usize,
    threshold: f32,
    impurity: f64,
}

/// A fitted classification tree over class indices `0..n_classes`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    n_features: usize,
    n_classes: usize,
}

impl DecisionTree {
    /// Grow a tree on the rows of `x` selected by `samples`
    ///
    /// `samples` may repeat indices (bootstrap draws). `y[i]` is the class
    /// index of row `i`.
    pub fn fit<R: Rng + ?Sized>(
        x: &[FeatureVector],
        y: &[usize],
        samples: &[usize],
        n_classes: usize,
        params: &TreeParams,
        rng: &mut R,
    ) -> Result<Self, ForestError> {
        if samples.is_empty() {
            return Err(ForestError::EmptyTrainingSet);
        }
        if x.len() != y.len() {
            return Err(ForestError::LengthMismatch {
                features: x.len(),
                labels: y.len(),
            });
        }
        let n_features = x.first().map(|row| row.dim()).unwrap_or(0);
        if let Some(row) = x.iter().find(|row| row.dim() != n_features) {
            return Err(ForestError::InvalidDimension {
                expected: n_features,
                actual: row.dim(),
            });
        }
        if let Some(&label) = y.iter().find(|&&label| label >= n_classes) {
            return Err(ForestError::UnknownClass(label));
        }
        if let Some(&i) = samples.iter().find(|&&i| i >= x.len()) {
            return Err(ForestError::SampleOutOfRange(i));
        }

        let mut tree = Self {
            nodes: Vec::new(),
            n_features,
            n_classes,
        };

        let mut features: Vec<usize> = (0..n_features).collect();
        let max_features = params
            .max_features
            .unwrap_or(n_features)
            .clamp(1, n_features.max(1));

        // (node slot, samples reaching it, depth)
        let mut stack: Vec<(usize, Vec<usize>, usize)> = vec![(0, samples.to_vec(), 0)];
        tree.nodes.push(Node::Leaf {
            distribution: Vec::new(),
        });

        while let Some((slot, node_samples, depth)) = stack.pop() {
            let counts = class_counts(y, &node_samples, n_classes);
            let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
            let depth_reached = params.max_depth.is_some_and(|d| depth >= d);

            let split = if pure || depth_reached || node_samples.len() < params.min_samples_split {
                None
            } else {
                features.shuffle(rng);
                best_split(x, y, &node_samples, &features, max_features, n_classes)
            };

            match split {
                Some(candidate) => {
                    let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = node_samples
                        .iter()
                        .partition(|&&i| x[i].as_slice()[candidate.feature] <= candidate.threshold);

                    let left = tree.nodes.len();
                    let right = left + 1;
                    tree.nodes.push(Node::Leaf {
                        distribution: Vec::new(),
                    });
                    tree.nodes.push(Node::Leaf {
                        distribution: Vec::new(),
                    });
                    tree.nodes[slot] = Node::Split {
                        feature: candidate.feature,
                        threshold: candidate.threshold,
                        left,
                        right,
                    };

                    stack.push((right, right_samples, depth + 1));
                    stack.push((left, left_samples, depth + 1));
                }
                None => {
                    let total = node_samples.len() as f32;
                    tree.nodes[slot] = Node::Leaf {
                        distribution: counts.iter().map(|&c| c as f32 / total).collect(),
                    };
                }
            }
        }

        Ok(tree)
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[inline]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Longest root-to-leaf path
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((idx, depth)) = stack.pop() {
            match &self.nodes[idx] {
                Node::Split { left, right, .. } => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
                Node::Leaf { .. } => max_depth = max_depth.max(depth),
            }
        }
        max_depth
    }

    /// Class distribution of the leaf reached by `features`
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<&[f32], ForestError> {
        if features.dim() != self.n_features {
            return Err(ForestError::InvalidDimension {
                expected: self.n_features,
                actual: features.dim(),
            });
        }

        let values = features.as_slice();
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if values[*feature] <= *threshold { *left } else { *right };
                }
                Node::Leaf { distribution } => return Ok(distribution),
            }
        }
    }

    /// Most probable class index (lowest index on ties)
    pub fn predict(&self, features: &FeatureVector) -> Result<usize, ForestError> {
        let distribution = self.predict_proba(features)?;
        Ok(argmax(distribution))
    }
}

/// Index of the largest value, first one on ties
pub(crate) fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

fn class_counts(y: &[usize], samples: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &i in samples {
        counts[y[i]] += 1;
    }
    counts
}

/// Lowest weighted Gini impurity split over randomly ordered features
///
/// Constant features do not count toward `max_features`.
fn best_split(
    x: &[FeatureVector],
    y: &[usize],
    samples: &[usize],
    features: &[usize],
    max_features: usize,
    n_classes: usize,
) -> Option<Candidate> {
    let n = samples.len();
    let total_counts = class_counts(y, samples, n_classes);
    let total_sq: u64 = total_counts.iter().map(|&c| (c * c) as u64).sum();

    let mut best: Option<Candidate> = None;
    let mut visited = 0;
    let mut column: Vec<(f32, usize)> = Vec::with_capacity(n);
    let mut left_counts = vec![0usize; n_classes];

    for &feature in features {
        if visited >= max_features {
            break;
        }

        column.clear();
        column.extend(samples.iter().map(|&i| (x[i].as_slice()[feature], y[i])));
        column.sort_by(|a, b| a.0.total_cmp(&b.0));

        if column[0].0 == column[n - 1].0 {
            continue;
        }
        visited += 1;

        left_counts.iter_mut().for_each(|c| *c = 0);
        let mut left_sq: u64 = 0;
        let mut right_sq: u64 = total_sq;

        for pos in 0..n - 1 {
            let (value, class) = column[pos];
            let right_c = (total_counts[class] - left_counts[class]) as u64;
            let left_c = left_counts[class] as u64;
            left_sq += 2 * left_c + 1;
            right_sq -= 2 * right_c - 1;
            left_counts[class] += 1;

            let next = column[pos + 1].0;
            if next <= value {
                continue;
            }

            let n_left = (pos + 1) as f64;
            let n_right = (n - pos - 1) as f64;
            let gini_left = 1.0 - left_sq as f64 / (n_left * n_left);
            let gini_right = 1.0 - right_sq as f64 / (n_right * n_right);
            let impurity = (n_left * gini_left + n_right * gini_right) / n as f64;

            if best.map_or(true, |b| impurity < b.impurity) {
                best = Some(Candidate {
                    feature,
                    threshold: value + (next - value) / 2.0,
                    impurity,
                });
            }
        }
    }

    best
}
