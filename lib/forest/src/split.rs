//! Seeded train/test partitioning

use crate::ForestError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Rows partitioned into a training and a held-out part
#[derive(Debug, Clone)]
pub struct TrainTestSplit<X, Y> {
    pub x_train: Vec<X>,
    pub x_test: Vec<X>,
    pub y_train: Vec<Y>,
    pub y_test: Vec<Y>,
}

/// Shuffle rows with `seed` and hold out `ceil(n * test_size)` of them
///
/// `test_size` must lie strictly between 0 and 1, and at least one row
/// must remain for training.
pub fn train_test_split<X: Clone, Y: Clone>(
    x: &[X],
    y: &[Y],
    test_size: f64,
    seed: u64,
) -> Result<TrainTestSplit<X, Y>, ForestError> {
    if x.len() != y.len() {
        return Err(ForestError::LengthMismatch {
            features: x.len(),
            labels: y.len(),
        });
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(ForestError::InvalidConfig(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n = x.len();
    let n_test = (n as f64 * test_size).ceil() as usize;
    if n_test >= n {
        return Err(ForestError::InvalidConfig(format!(
            "test_size {} leaves no training rows out of {}",
            test_size, n
        )));
    }

    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    let (test_idx, train_idx) = order.split_at(n_test);

    Ok(TrainTestSplit {
        x_train: train_idx.iter().map(|&i| x[i].clone()).collect(),
        x_test: test_idx.iter().map(|&i| x[i].clone()).collect(),
        y_train: train_idx.iter().map(|&i| y[i].clone()).collect(),
        y_test: test_idx.iter().map(|&i| y[i].clone()).collect(),
    })
}
