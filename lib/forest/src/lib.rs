//! # Diagnox Forest
//!
//! Random forest classifier used to rank diseases from symptom vectors.
//!
//! - [`DecisionTree`] - CART tree with Gini impurity and per-node random feature order
//! - [`RandomForest`] - Bootstrap-bagged trees, fitted in parallel, mean leaf probabilities
//! - [`train_test_split`] - Seeded hold-out split
//! - [`accuracy`] - Held-out evaluation
//!
//! ## Example
//!
//! ```rust
//! use diagnox_core::FeatureVector;
//! use diagnox_forest::{ForestConfig, RandomForest};
//!
//! let x = vec![
//!     FeatureVector::new(vec![1.0, 1.0, 0.0]),
//!     FeatureVector::new(vec![0.0, 0.0, 1.0]),
//! ];
//! let y = vec!["Fungal infection".to_string(), "Common Cold".to_string()];
//!
//! let config = ForestConfig { n_trees: 10, ..ForestConfig::default() };
//! let forest = RandomForest::fit(&config, &x, &y).unwrap();
//! let proba = forest.predict_proba(&x[0]).unwrap();
//! assert_eq!(proba.len(), 2);
//! ```

pub mod tree;
pub mod forest;
pub mod split;
pub mod metrics;

pub use tree::{DecisionTree, TreeParams};
pub use forest::{ForestConfig, MaxFeatures, RandomForest};
pub use split::{train_test_split, TrainTestSplit};
pub use metrics::{accuracy, accuracy_percent};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForestError {
    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Feature/label count mismatch: {features} feature rows, {labels} labels")]
    LengthMismatch { features: usize, labels: usize },

    #[error("Invalid feature dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Class index out of range: {0}")]
    UnknownClass(usize),

    #[error("Sample index out of range: {0}")]
    SampleOutOfRange(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<ForestError> for diagnox_core::Error {
    fn from(e: ForestError) -> Self {
        match e {
            ForestError::EmptyTrainingSet => diagnox_core::Error::EmptyTrainingSet,
            ForestError::InvalidDimension { expected, actual } => {
                diagnox_core::Error::InvalidDimension { expected, actual }
            }
            ForestError::InvalidConfig(msg) => diagnox_core::Error::InvalidConfig(msg),
            other => diagnox_core::Error::Model(other.to_string()),
        }
    }
}
