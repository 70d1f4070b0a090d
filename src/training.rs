//! Startup training: split, fit, evaluate, bind

use diagnox_core::{Datasets, Error, Predictor, Result};
use diagnox_forest::{accuracy_percent, train_test_split, ForestConfig, RandomForest};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Outcome of the startup fit
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub train_rows: usize,
    pub test_rows: usize,
    /// Held-out accuracy in percent, `None` when nothing was held out
    pub accuracy_percent: Option<f64>,
    pub elapsed: Duration,
}

/// Fit a forest on the incidence table
///
/// With `test_size` in (0, 1) a seeded hold-out split is evaluated;
/// `test_size == 0` trains on every row and skips evaluation.
pub fn train(
    datasets: &Datasets,
    config: &ForestConfig,
    test_size: f64,
) -> Result<(RandomForest, TrainingReport)> {
    if !(0.0..1.0).contains(&test_size) {
        return Err(Error::InvalidConfig(format!(
            "test size must be in [0, 1), got {}",
            test_size
        )));
    }

    let started = Instant::now();
    let (x, y) = datasets.incidence.training_data();

    let (forest, test_rows, accuracy) = if test_size > 0.0 {
        let split = train_test_split(&x, &y, test_size, config.seed)?;
        let forest = RandomForest::fit(config, &split.x_train, &split.y_train)?;
        let predicted = forest.predict_batch(&split.x_test)?;
        let accuracy = accuracy_percent(&split.y_test, &predicted);
        (forest, split.x_test.len(), Some(accuracy))
    } else {
        (RandomForest::fit(config, &x, &y)?, 0, None)
    };

    let report = TrainingReport {
        train_rows: x.len() - test_rows,
        test_rows,
        accuracy_percent: accuracy,
        elapsed: started.elapsed(),
    };

    info!(
        "Trained {} trees on {} rows in {:.2?}",
        forest.n_trees(),
        report.train_rows,
        report.elapsed
    );
    if let Some(acc) = report.accuracy_percent {
        info!("Accuracy of Random Forest model: {:.2}%", acc);
    }

    Ok((forest, report))
}

/// Train on `datasets` and wrap everything in a shareable [`Predictor`]
pub fn build_predictor(
    datasets: Datasets,
    config: &ForestConfig,
    test_size: f64,
) -> Result<(Predictor, TrainingReport)> {
    let (forest, report) = train(&datasets, config, test_size)?;
    let predictor = Predictor::new(Arc::new(datasets), Arc::new(forest))?;
    Ok((predictor, report))
}
