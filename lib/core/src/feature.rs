use serde::{Deserialize, Serialize};

/// Symptom identifier, one per incidence-table column
pub type Symptom = String;

/// Disease label, one per distinct value of the incidence-table label column
pub type Disease = String;

/// Binary symptom indicator vector used as classifier input
///
/// Position `i` holds 1.0 when the symptom of column `i` was reported and
/// 0.0 otherwise. Length always equals the symptom column count of the
/// table that built it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector {
    data: Vec<f32>,
}

impl FeatureVector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// All-zero vector of the given dimension
    #[inline]
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self {
            data: vec![0.0; dim],
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mark the symptom at `index` as present
    #[inline]
    pub fn set(&mut self, index: usize) {
        if let Some(slot) = self.data.get_mut(index) {
            *slot = 1.0;
        }
    }

    #[inline]
    #[must_use]
    pub fn is_set(&self, index: usize) -> bool {
        self.data.get(index).is_some_and(|v| *v > 0.0)
    }

    /// Number of symptoms marked present
    #[inline]
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.data.iter().filter(|v| **v > 0.0).count()
    }
}

impl From<Vec<f32>> for FeatureVector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_and_set() {
        let mut v = FeatureVector::zeros(4);
        assert_eq!(v.dim(), 4);
        assert_eq!(v.active_count(), 0);

        v.set(2);
        v.set(2);
        assert!(v.is_set(2));
        assert!(!v.is_set(0));
        assert_eq!(v.as_slice(), &[0.0, 0.0, 1.0, 0.0]);
        assert_eq!(v.active_count(), 1);
    }

    #[test]
    fn test_set_out_of_range_is_ignored() {
        let mut v = FeatureVector::zeros(2);
        v.set(5);
        assert_eq!(v.active_count(), 0);
        assert!(!v.is_set(5));
    }
}
