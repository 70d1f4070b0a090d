use crate::{Disease, FeatureVector, Result};

/// A fitted multi-class probabilistic classifier
///
/// `predict_proba` returns one probability per entry of `classes()`, in
/// the same order.
pub trait Classifier: Send + Sync {
    /// Class labels in the classifier's internal order
    fn classes(&self) -> &[Disease];

    /// Expected feature vector dimension
    fn n_features(&self) -> usize;

    /// Probability distribution over `classes()` for a single sample
    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f32>>;
}
